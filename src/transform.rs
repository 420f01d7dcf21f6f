//! Per-record transformation: Cyrillic-to-Latin transliteration.
//!
//! The transform is a pure character-substitution over the input line;
//! characters without a mapping pass through unchanged. [`process`] wraps the
//! substitution with a fixed artificial delay to simulate a bounded unit of
//! work per record. Any stateless pure function of the same signature is
//! substitutable here without touching the pool.

use std::time::Duration;

use tokio::time;

/// Artificial per-record processing delay.
pub const PROCESS_DELAY: Duration = Duration::from_millis(50);

/// Applies the simulated work delay, then transliterates the record.
pub async fn process(input: &str) -> String {
    time::sleep(PROCESS_DELAY).await;
    transliterate(input)
}

/// Transliterates Cyrillic characters to their Latin representation.
///
/// `"привет"` becomes `"privet"`, `"Виктор"` becomes `"Viktor"`, `"Хлеб"`
/// becomes `"Khleb"`. Unmapped characters are copied through as-is.
pub fn transliterate(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for ch in input.chars() {
        match map_char(ch) {
            Some(latin) => output.push_str(latin),
            None => output.push(ch),
        }
    }
    output
}

/// Substitution table. The hard sign maps to the empty string, the soft sign
/// to an apostrophe; digraph capitalization follows the conventional form
/// (`Щ` becomes `Shch`, not `SHCH`).
fn map_char(ch: char) -> Option<&'static str> {
    let latin = match ch {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "kh",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "shch",
        'ъ' => "",
        'ы' => "y",
        'ь' => "'",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        'А' => "A",
        'Б' => "B",
        'В' => "V",
        'Г' => "G",
        'Д' => "D",
        'Е' => "E",
        'Ё' => "Yo",
        'Ж' => "Zh",
        'З' => "Z",
        'И' => "I",
        'Й' => "Y",
        'К' => "K",
        'Л' => "L",
        'М' => "M",
        'Н' => "N",
        'О' => "O",
        'П' => "P",
        'Р' => "R",
        'С' => "S",
        'Т' => "T",
        'У' => "U",
        'Ф' => "F",
        'Х' => "Kh",
        'Ц' => "Ts",
        'Ч' => "Ch",
        'Ш' => "Sh",
        'Щ' => "Shch",
        'Ъ' => "",
        'Ы' => "Y",
        'Ь' => "'",
        'Э' => "E",
        'Ю' => "Yu",
        'Я' => "Ya",
        _ => return None,
    };
    Some(latin)
}
