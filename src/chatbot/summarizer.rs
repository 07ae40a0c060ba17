//! Keyword summarizer that turns a chat transcript into the prefilled message
//! of a callback request.
//!
//! Every category is a list of `(keywords, label)` entries checked in order
//! against the lowercased user text. Keywords match at the start of a word.
//! The first entry with any keyword present wins; categories are independent
//! of each other.

use once_cell::sync::Lazy;
use regex::Regex;

use super::provider::{ChatMessage, ChatRole};

type KeywordTable = &'static [(&'static [&'static str], &'static str)];

const RECIPIENTS: KeywordTable = &[
    (&["мам"], "маме"),
    (&["бабушк", "бабул"], "бабушке"),
    (&["жене", "жену", "жена", "супруг"], "жене"),
    (&["девушк", "любимой"], "девушке"),
    (&["подруг"], "подруге"),
    (&["сестр"], "сестре"),
    (&["дочк", "дочер", "дочь"], "дочери"),
    (&["коллег", "начальни", "руководител"], "коллеге"),
    (&["учител", "воспитател"], "учителю"),
    (&["мужу", "мужчин", "парню", "папе", "отцу"], "мужчине"),
];

const OCCASIONS: KeywordTable = &[
    (&["8 марта", "восьмое марта", "женский день"], "8 марта"),
    (
        &["день рождения", "дня рождения", "днём рождения", "днем рождения", "днюх"],
        "день рождения",
    ),
    (&["юбиле"], "юбилей"),
    (&["свадьб", "бракосочетан"], "свадьбу"),
    (&["годовщин"], "годовщину"),
    (&["14 февраля", "валентин"], "День святого Валентина"),
    (&["выпускн"], "выпускной"),
    (&["1 сентября", "первое сентября", "день знаний"], "1 сентября"),
    (&["роддом", "выписк"], "выписку из роддома"),
    (&["корпоратив"], "корпоратив"),
];

const FLOWERS: KeywordTable = &[
    (&["розы", "роза", "розу", "роз ", "розами", "розочк"], "розы"),
    (&["тюльпан"], "тюльпаны"),
    (&["пион"], "пионы"),
    (&["хризантем"], "хризантемы"),
    (&["орхиде"], "орхидеи"),
    (&["лили"], "лилии"),
    (&["гортенз"], "гортензии"),
    (&["ромаш"], "ромашки"),
    (&["гербер"], "герберы"),
    (&["эустом", "лизиантус"], "эустомы"),
    (&["ирис"], "ирисы"),
    (&["подсолнух"], "подсолнухи"),
];

const COLORS: KeywordTable = &[
    (&["розов"], "розовые"),
    (&["красн", "алые", "алых"], "красные"),
    (&["бел"], "белые"),
    (&["жёлт", "желт"], "жёлтые"),
    (&["оранжев"], "оранжевые"),
    (&["фиолет", "сиренев", "лилов"], "фиолетовые"),
    (&["голуб", "синие", "синих", "синий"], "голубые"),
    (&["пастел", "нежн"], "пастельные"),
    (&["ярк"], "яркие"),
];

const URGENCY: KeywordTable = &[
    (&["срочно", "как можно скорее", "прямо сейчас", "побыстрее"], "срочно"),
    (&["сегодня"], "сегодня"),
    (&["завтра"], "завтра"),
];

/// Amounts below this are ignored unless a currency or thousand marker follows.
const MIN_BARE_BUDGET: u64 = 500;

// Groups: 1 budget cue before the amount, 2 amount (spaces only between
// three-digit groups), 3 thousand marker, 4 currency marker.
static BUDGET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(\b(?:бюджет[а-я]*|до|за|около|примерно|в пределах)[\s:]*(?:до\s+|около\s+|в\s+)?)?",
        r"(\d{1,3}(?: \d{3})+|\d+)",
        r"\s*(тыс[а-я.]*|к\b|k\b)?",
        r"\s*(руб[а-я.]*|р\.|р\b|₽)?",
    ))
    .expect("budget pattern is valid")
});

/// Fields extracted from a transcript.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChatSummary {
    pub recipient: Option<&'static str>,
    pub occasion: Option<&'static str>,
    pub flower: Option<&'static str>,
    pub color: Option<&'static str>,
    pub budget: Option<String>,
    pub urgency: Option<&'static str>,
}

impl ChatSummary {
    pub fn is_empty(&self) -> bool {
        *self == ChatSummary::default()
    }
}

/// True when `keyword` occurs in `text` not preceded by a letter.
fn contains_word_prefix(text: &str, keyword: &str) -> bool {
    text.match_indices(keyword).any(|(i, _)| {
        text[..i]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphabetic())
    })
}

fn first_match(text: &str, table: KeywordTable) -> Option<&'static str> {
    table
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| contains_word_prefix(text, k)))
        .map(|(_, label)| *label)
}

fn extract_budget(text: &str) -> Option<String> {
    BUDGET_RE.captures_iter(text).find_map(|caps| {
        let digits: String = caps[2].chars().filter(|c| c.is_ascii_digit()).collect();
        let mut amount: u64 = digits.parse().ok()?;
        let cued = caps.get(1).is_some();
        let thousands = caps.get(3).is_some();
        let currency = caps.get(4).is_some();
        if thousands {
            amount = amount.checked_mul(1000)?;
        }
        if thousands || currency || (cued && amount >= MIN_BARE_BUDGET) {
            Some(format!("{amount} руб."))
        } else {
            None
        }
    })
}

/// Extracts the summary fields from the user turns of a transcript.
pub fn extract(messages: &[ChatMessage]) -> ChatSummary {
    let mut text = messages
        .iter()
        .filter(|m| m.role == ChatRole::User)
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    // lets word-final keywords such as "роз " match at the very end
    text.push(' ');

    ChatSummary {
        recipient: first_match(&text, RECIPIENTS),
        occasion: first_match(&text, OCCASIONS),
        flower: first_match(&text, FLOWERS),
        color: first_match(&text, COLORS),
        budget: extract_budget(&text),
        urgency: first_match(&text, URGENCY),
    }
}

/// Builds the Russian callback message from a transcript.
pub fn summarize(messages: &[ChatMessage]) -> String {
    render(&extract(messages))
}

pub fn render(summary: &ChatSummary) -> String {
    if summary.is_empty() {
        return "Здравствуйте! Хочу получить консультацию по выбору букета. Пожалуйста, перезвоните мне."
            .to_string();
    }

    let mut out = String::from("Здравствуйте! Хочу заказать букет");
    if let Some(recipient) = summary.recipient {
        out.push(' ');
        out.push_str(recipient);
    }
    if let Some(occasion) = summary.occasion {
        out.push_str(" на ");
        out.push_str(occasion);
    }
    out.push('.');

    match (summary.color, summary.flower) {
        (Some(color), Some(flower)) => out.push_str(&format!(" Предпочтения: {color} {flower}.")),
        (None, Some(flower)) => out.push_str(&format!(" Предпочтения: {flower}.")),
        (Some(color), None) => out.push_str(&format!(" Предпочтения: {color} цветы.")),
        (None, None) => {}
    }
    if let Some(budget) = &summary.budget {
        out.push_str(&format!(" Бюджет: {budget}"));
    }
    if let Some(urgency) = summary.urgency {
        out.push_str(&format!(" Срочность: {urgency}."));
    }
    out.push_str(" Пожалуйста, перезвоните мне для уточнения деталей.");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript(user_turns: &[&str]) -> Vec<ChatMessage> {
        user_turns
            .iter()
            .flat_map(|t| {
                [
                    ChatMessage::user(*t),
                    ChatMessage::assistant("Отличный выбор! Что-нибудь ещё?"),
                ]
            })
            .collect()
    }

    #[test]
    fn mother_march_pink() {
        let summary = summarize(&transcript(&[
            "Хочу букет маме",
            "На 8 марта, что-нибудь розовые оттенки",
        ]));
        assert!(summary.contains("маме"));
        assert!(summary.contains("8 марта"));
        assert!(summary.contains("розовые"));
        assert!(summary.starts_with("Здравствуйте! Хочу заказать букет маме на 8 марта."));
    }

    #[test]
    fn first_entry_in_table_order_wins() {
        let summary = extract(&transcript(&["Букет для мамы и сестры, тюльпаны или пионы"]));
        assert_eq!(summary.recipient, Some("маме"));
        assert_eq!(summary.flower, Some("тюльпаны"));
    }

    #[test]
    fn assistant_turns_are_ignored() {
        let messages = vec![
            ChatMessage::assistant("Может быть, розы на свадьбу?"),
            ChatMessage::user("Да, подумаю"),
        ];
        let summary = extract(&messages);
        assert_eq!(summary.flower, None);
        assert_eq!(summary.occasion, None);
    }

    #[test]
    fn pink_does_not_imply_roses() {
        let summary = extract(&transcript(&["что-то розовое и нежное"]));
        assert_eq!(summary.color, Some("розовые"));
        assert_eq!(summary.flower, None);
    }

    #[test]
    fn roses_at_end_of_text() {
        let summary = extract(&transcript(&["нужен букет из 51 роз"]));
        assert_eq!(summary.flower, Some("розы"));
        assert_eq!(summary.budget, None);
    }

    #[test]
    fn budget_with_thousands_and_currency() {
        assert_eq!(
            extract(&transcript(&["бюджет до 5 тыс"])).budget.as_deref(),
            Some("5000 руб.")
        );
        assert_eq!(
            extract(&transcript(&["готова потратить 3500 рублей"])).budget.as_deref(),
            Some("3500 руб.")
        );
        assert_eq!(
            extract(&transcript(&["бюджет 4000"])).budget.as_deref(),
            Some("4000 руб.")
        );
    }

    #[test]
    fn phone_numbers_are_not_budgets() {
        let summary = extract(&transcript(&["мой номер 8 999 123 45 67, бюджет 3000"]));
        assert_eq!(summary.budget.as_deref(), Some("3000 руб."));

        let summary = extract(&transcript(&["бюджет обсудим, телефон 89991234567"]));
        assert_eq!(summary.budget, None);
    }

    #[test]
    fn grouped_thousands_are_one_amount() {
        assert_eq!(
            extract(&transcript(&["примерно 5 000 руб"])).budget.as_deref(),
            Some("5000 руб.")
        );
    }

    #[test]
    fn keywords_match_only_at_word_start() {
        let summary = extract(&transcript(&["прекрасные белые розы"]));
        assert_eq!(summary.color, Some("белые"));
        assert_eq!(summary.flower, Some("розы"));
    }

    #[test]
    fn dates_are_not_budgets() {
        let summary = extract(&transcript(&["на 8 марта, бюджет обсудим"]));
        assert_eq!(summary.budget, None);
    }

    #[test]
    fn full_summary_sentence() {
        let summary = summarize(&transcript(&[
            "Срочно нужен букет жене на годовщину",
            "Красные розы, бюджет 7000 руб",
        ]));
        assert_eq!(
            summary,
            "Здравствуйте! Хочу заказать букет жене на годовщину. Предпочтения: красные розы. \
Бюджет: 7000 руб. Срочность: срочно. Пожалуйста, перезвоните мне для уточнения деталей."
        );
    }

    #[test]
    fn nothing_matched_gives_generic_request() {
        let summary = summarize(&transcript(&["Здравствуйте, подскажите что-нибудь"]));
        assert_eq!(
            summary,
            "Здравствуйте! Хочу получить консультацию по выбору букета. Пожалуйста, перезвоните мне."
        );
    }
}
