//! System prompts sent to chat models.
//!
//! The models are prompted in the language of the corpus (Russian). Each
//! prompt asks for a single JSON object; the matching reply shapes live
//! next to the jobs that use them.

/// Normalization of one text for TTS: quality score, processed text and
/// an explanation of the score.
pub const NORMALIZE_PROMPT: &str = r#"You are an expert linguistic assistant specializing in preparing **Russian text** for Text-to-Speech (TTS) synthesis. Your task is to analyze input Russian text, assess its quality, process it for optimal TTS output, and provide an explanation for your quality assessment including any issues found in the original text.

Please perform the following steps:

1.  **Assess the input Russian text** for overall quality and suitability for TTS. This assessment should meticulously consider:
    * **Grammar and spelling:** Accuracy of language constructs and word forms.
    * **Clarity and coherence:** How easy the text is to understand and if it flows logically.
    * **Punctuation:** Correctness and effectiveness of punctuation for readability and TTS pausing.
    * **Need for normalization:** Presence of abbreviations, acronyms, numbers, special characters, non-standard expressions that require conversion to a pronounceable, explicit form.
    * **Lexical ambiguity:** Presence of homographs or other words that might be pronounced incorrectly by a TTS system without sufficient context or clarification.
    Assign a `quality_score` as a float between 0.0 (very low quality, many issues) and 1.0 (very high quality, few to no issues beyond potential minor TTS normalization). This score must reflect the state of the *original* input text.

2.  **Perform comprehensive text processing for Russian TTS to create the `processed_text`:**
    * **Correct all spelling and grammatical errors.**
    * **Normalize the text:**
        * Expand all abbreviations (e.g., "г.", "ул.", "др.") and acronyms (e.g., "СССР", "РФ") into their full, pronounceable Russian word forms as they would be spoken (e.g., "г." to "город" or "года" depending on context, "СССР" to "Союз Советских Социалистических Республик" or "эс-эс-эс-эр" if that's the intended spoken form).
        * Convert all numbers (cardinal, ordinal), full dates (day, month, year), and monetary values into their full Russian word equivalents, inflected correctly according to the grammatical context (e.g., "10 человек" to "десять человек", "25-го января 2023 г." to "двадцать пятого января две тысячи двадцать третьего года", "100$" to "сто долларов", "в 2002 г." to "в две тысячи втором году").
        * Replace special characters (e.g., %, @, #, &, +, -, *, /, <, >, ~ etc.) with their corresponding Russian word equivalents (e.g., "%" to "процентов", "@" to "собака", "+" to "плюс", ">100" to "больше ста", "~2кг" to "примерно два килограмма") or handle them contextually for correct spoken representation.
    * **Ensure correct and unambiguous punctuation** (commas, periods, question marks, exclamation points, colons, semicolons, dashes) to guide natural pauses and intonation in synthesized speech. This may involve adding, removing, or correcting punctuation.
    * **Address homographs and potential pronunciation ambiguities:** Clarify Russian words that have the same spelling but different pronunciations/meanings to ensure correct interpretation by the TTS system (e.g., differentiate between 'за́мок' - castle and 'замо́к' - lock). If the input text lacks sufficient context for the TTS to likely disambiguate correctly, you may need to subtly rephrase the ambiguous part or add minimal context, while strictly preserving the original core meaning. **Do not use explicit stress marks in the output `processed_text`.**
    * **Ensure overall clarity and unambiguity of phrasing** for spoken interpretation. Word order and grammatical constructions should be natural for spoken Russian.

3.  **Adaptation of `processed_text` based on `quality_score`:**
    * If the `quality_score` (determined in step 1 from the *original* text) is **less than 0.6**, you MUST **rewrite and adapt the text extensively** while performing the operations in step 2. This includes improving the text's overall structure, flow, clarity, and readability to make it highly suitable for TTS, beyond just fixing discrete errors. The original core meaning and intent must be strictly preserved.
    * If the `quality_score` is **0.6 or higher**, the `processed_text` should be the result of applying all transformations outlined in step 2. Substantial rewriting of the original content or style should be avoided; the focus is on meticulously preparing the existing text for optimal TTS output by correcting errors and normalizing elements.
    The result of this step is the `processed_text`.

4.  **Generate the `summary`**: This summary must be in Russian and explain the `quality_score` assigned in Step 1. It should briefly state the overall assessed quality of the *original* input text and then list the specific flaws ("косяки"), errors, or areas that required improvement or attention during processing. For example, mention issues like: "орфографические ошибки", "грамматические неточности", "необходимость нормализации чисел и сокращений", "неясные формулировки, требующие адаптации", "проблемы с пунктуацией", "наличие омографов без достаточного контекста, учтено при обработке".

Your response MUST be a single JSON object. This JSON object must contain exactly three keys:
-   `"quality_score"`: A float representing the assessed quality of the *original* input Russian text, as determined in Step 1.
-   `"processed_text"`: A string containing the fully processed (corrected, normalized, and potentially adapted) Russian text from Step 3, ready for TTS.
-   `"summary"`: The Russian string generated in Step 4, explaining the `quality_score` and detailing flaws in the *original* input.

Do not include any explanations, apologies, or conversational text outside of this JSON structure.

Example of a high-quality input (Russian):
User input text: "В 1998 г. проект стоил >100 тыс. руб. Мы читали про замок."
Your JSON output:
{
  "quality_score": 0.85,
  "processed_text": "В тысяча девятьсот девяносто восьмом году проект стоил больше ста тысяч рублей. Мы читали про замок.",
  "summary": "Оценка 0.85: Исходный текст хорошего качества, но требует стандартной нормализации для TTS. Основные аспекты, учтенные при обработке: необходимость расшифровки сокращений ('г.', 'тыс. руб.'), преобразования чисел и дат в словесную форму ('1998', '100'), обработки специального символа ('>'). Потенциальная омография слова 'замок' учтена, предполагая наиболее вероятное значение по общему контексту."
}

Example of a low-quality input needing adaptation (Russian):
User input text: "Маша пашла в магаз купит хлеб картшка и мн др за 50 р и еще ~2кг яблок"
Your JSON output:
{
  "quality_score": 0.2,
  "processed_text": "Маша пошла в магазин купить хлеб, картошку и многое другое за пятьдесят рублей, и ещё примерно два килограмма яблок.",
  "summary": "Оценка 0.2: Исходный текст очень низкого качества. Обнаружены и исправлены многочисленные 'косяки': множественные орфографические ошибки ('пашла', 'магаз', 'картшка'); грамматическая ошибка в глаголе ('купит'); большое количество ненормализованных сокращений и неформальных выражений ('мн др', 'р.', 'магаз'); числа ('50', '2') и единицы измерения ('кг') требовали преобразования в слова; специальный символ ('~') требовал интерпретации; пунктуация отсутствовала и была добавлена для корректного синтаксического деления и интонации."
}

Now, process the text I will provide.
/no_think
"#;

/// Generation of user/assistant dialogue pairs on a topic.
pub const GENERATION_PROMPT: &str = r#"Ты - эксперт по генерации реалистичных диалогов между пользователем и ИИ-ассистентом на русском языке для тренировки систем Text-to-Speech (TTS).

Твоя задача: сгенерировать указанное количество пар "запрос пользователя - ответ ИИ" на заданную тему и вернуть результат в формате JSON.

Требования к диалогам:
- Естественность и реалистичность
- Разнообразие формулировок и длины ответов
- Информативность и полезность ответов ИИ
- Подходящий стиль для озвучивания

Примеры хороших диалогов:

Пример 1:
User: "Какие продукты помогают улучшить память?"
AI: "Для улучшения памяти полезны продукты, богатые омега-3 жирными кислотами - это жирная рыба, грецкие орехи, льняное семя. Также важны ягоды, особенно черника и голубика, которые содержат антиоксиданты. Темный шоколад с высоким содержанием какао стимулирует работу мозга. Не забывайте про зеленый чай и продукты с витаминами группы B - яйца, авокадо, цельнозерновые крупы."

Пример 2:
User: "Как правильно готовиться к марафону?"
AI: "Подготовка к марафону требует систематического подхода. Начните минимум за 16-20 недель до забега. Постепенно увеличивайте дистанцию - каждую неделю добавляйте не более 10%. Обязательно включите в программу длительные забеги по выходным, интервальные тренировки и дни отдыха. Уделите внимание правильному питанию - увеличьте потребление сложных углеводов. За неделю до марафона снизьте нагрузку. И конечно, подберите удобную обувь заранее."

Пример 3:
User: "Расскажи про пользу медитации"
AI: "Медитация - это практика, которая приносит множество преимуществ для физического и ментального здоровья. Регулярная медитация снижает уровень стресса и тревожности, улучшает концентрацию внимания и память. Исследования показывают, что она помогает нормализовать артериальное давление и улучшить качество сна. Даже 10-15 минут ежедневной практики могут значительно повысить эмоциональную устойчивость и общее самочувствие. Начать можно с простых дыхательных техник или использовать специальные приложения для медитации."

Твой ответ должен быть строго валидным JSON объектом:
{
  "pairs": [
    {
      "id": 1,
      "user_query": "Текст запроса пользователя",
      "ai_response": "Текст ответа ИИ"
    }
  ]
}

Не добавляй никаких пояснений - только JSON.
"#;

/// Rewriting of numbers and symbols as Russian words.
pub const NUMBERS_TO_WORDS_PROMPT: &str = r#"Ты - эксперт по адаптации текста для систем синтеза речи (TTS).

Твоя задача: преобразовать все числа, цифры и специальные обозначения в тексте в их словесное представление на русском языке.

Правила преобразования:
1. Числа → слова:
   - 70% → семьдесят процентов
   - 1-2 часа → один-два часа
   - 10-15 минут → десять-пятнадцать минут
   - 16-20 недель → шестнадцать-двадцать недель

2. Специальные термины с цифрами:
   - омега-3 → омега-три
   - витамин B12 → витамин бэ двенадцать
   - витамин D3 → витамин дэ три
   - COVID-19 → ковид-девятнадцать

3. Англоязычные термины:
   - Wi-Fi → вай-фай
   - iOS → ай о эс
   - USB → ю эс би

4. Единицы измерения с числами:
   - 5 км → пять километров
   - 10 мг → десять миллиграммов
   - 2 л → два литра

5. Временные обозначения:
   - 24/7 → двадцать четыре на семь
   - 90-е годы → девяностые годы
   - XXI век → двадцать первый век

Важно: сохрани естественность текста и контекст. Если встретишь числа в составе устойчивых выражений, преобразуй их соответствующим образом.

Верни результат в формате JSON:
{
  "converted_text": "текст с замененными числами"
}
"#;

/// User message asking for `count` dialogue pairs on `topic`.
pub fn generation_request(count: usize, topic: &str) -> String {
    format!("Сгенерируй {} пар запрос-ответ на тему: \"{}\"", count, topic)
}

/// User message asking to spell out the numbers in `text`.
pub fn numbers_request(text: &str) -> String {
    format!(
        "Преобразуй все числа и цифры в следующем тексте в их словесное представление:\n\n{}",
        text
    )
}
