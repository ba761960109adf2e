// Output formatting — user-facing messages and terminal display.

pub mod terminal;

use crate::scoring::ScoreResult;

/// Message for a text that matched no theme keyword at all.
pub const UNDETERMINED_MESSAGE: &str =
    "Тему текста определить не удалось: совпадений с ключевыми словами нет.";

/// Capitalize the first letter of every word and lowercase the rest.
///
/// A word starts after any non-alphabetic character, so "северный-полюс"
/// becomes "Северный-Полюс".
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Render a percentage with at least one decimal place: `100.0`, `50.0`,
/// `33.33`.
pub fn format_percent(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// The classification report: the winning theme, then every theme's share.
pub fn format_classification(result: &ScoreResult) -> String {
    let winner = result.winner();
    let mut answer = format!(
        "\nТема текста: {}\n\nОбщая вероятность по всем темам:\n",
        title_case(&winner.name)
    );
    for score in result.scores() {
        answer.push_str(&format!(
            "Тема: {} - {}%\n",
            title_case(&score.name),
            format_percent(score.percent)
        ));
    }
    answer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("спорт"), "Спорт");
        assert_eq!(title_case("ЗИМА"), "Зима");
        assert_eq!(title_case("северный полюс"), "Северный Полюс");
        assert_eq!(title_case("северный-полюс"), "Северный-Полюс");
        assert_eq!(title_case("3d графика"), "3D Графика");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(100.0), "100.0");
        assert_eq!(format_percent(50.0), "50.0");
        assert_eq!(format_percent(33.33), "33.33");
        assert_eq!(format_percent(0.0), "0.0");
        assert_eq!(format_percent(12.5), "12.5");
    }
}
