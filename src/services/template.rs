//! 새 하루 계획의 기본 텍스트.
//!
//! 섹션 제목은 `day_parser::SECTION_MARKERS`의 표식과 글자 그대로 같아야 하고,
//! 안내 문구는 모두 안내 접두사로 시작해야 합니다. 그래야 수정하지 않은
//! 템플릿이 작업/지표 없이 파싱됩니다 (`day_parser` 테스트에서 확인).

pub const DEFAULT_PLAN_TEXT: &str = "\
Одна Велика справа
Опишіть одну справу, яка найбільше наблизить вас до мети.
Час вказуйте в дужках: (10:00-12:00) або (2 год 30 хв).

3–5 середніх справ
Опишіть справи, які важливо завершити сьогодні.
Порада: оцінюйте час чесно і залишайте запас.

Дрібні справи
Опишіть дрібні задачі: листи, дзвінки, узгодження.
Що зміниться, якщо зробити їх одним блоком?

---

Метрики за вчора
Напишіть фактичні результати за вчора.
Формат: Назва: число коментар

Очікувані метрики
Напишіть, яких результатів очікуєте сьогодні.
Формат: Назва: число коментар
";
