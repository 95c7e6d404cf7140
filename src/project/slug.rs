//! Turns arbitrary titles into path segments and ids. Cyrillic is transliterated with a fixed
//! table, other latin letters lose their diacritics and everything else is dropped.

use std::iter;

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use super::path::{child_path, SEPARATOR};

fn transliterate_cyrillic(c: char) -> Option<&'static str> {
    let latin = match c {
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
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' | 'ь' => "",
        'ы' => "y",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(latin)
}

/// Produces a lowercase slug made of `[a-z0-9-]`. Can be empty if the title has nothing
/// representable, path validation rejects that later.
///
/// ```
/// use timetree::project::slug::slugify;
/// assert_eq!(slugify("Б24 Отчеты"), "b24-otchety");
/// assert_eq!(slugify("React Components"), "react-components");
/// ```
pub fn slugify(title: &str) -> String {
    let mut raw = String::with_capacity(title.len());
    for c in title.chars() {
        // The table is keyed by lowercase letters, the result is lowercased anyway.
        let lower = c.to_lowercase().next().unwrap_or(c);
        if let Some(latin) = transliterate_cyrillic(lower) {
            raw.push_str(latin);
        } else if c.is_whitespace() || c == '.' {
            raw.push('-');
        } else if c.is_ascii_alphanumeric() || c == '-' {
            raw.push(c);
        } else {
            // "é" decomposes into "e" and a combining accent, the accent gets dropped.
            raw.extend(
                iter::once(c)
                    .nfd()
                    .filter(|v| !is_combining_mark(*v))
                    .filter(|v| v.is_ascii_alphanumeric()),
            );
        }
    }

    let mut slug = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c == '-' && (slug.is_empty() || slug.ends_with('-')) {
            continue;
        }
        slug.push(c.to_ascii_lowercase());
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

pub fn id_from_title(title: &str) -> String {
    slugify(title)
}

pub fn path_from_title(title: &str, parent: Option<&str>) -> String {
    child_path(parent, &slugify(title))
}

pub fn id_from_path(path: &str) -> String {
    path.replace(SEPARATOR, "-")
}
