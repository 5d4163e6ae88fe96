//! Key ordering for sorted output.
//!
//! The default order is "natural": letter case, Latin-1 diacritics and
//! fullwidth forms are ignored, and runs of digits compare by numeric value,
//! so `item2` sorts before `item10`. Keys that are equal under those rules
//! fall back to plain byte order, which keeps the ordering total.

use std::cmp::Ordering;
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;
use std::sync::Arc;

type Comparator = Arc<dyn Fn(&[u8], &[u8]) -> Ordering + Send + Sync>;

/// A comparator over key bytes.
///
/// ```rust
/// use serde_linecoder::KeyOrder;
/// use std::cmp::Ordering;
///
/// let order = KeyOrder::natural();
/// assert_eq!(order.compare(b"evens.8", b"evens.10"), Ordering::Less);
///
/// let reversed = KeyOrder::custom(|a, b| b.cmp(a));
/// assert_eq!(reversed.compare(b"a", b"b"), Ordering::Greater);
/// ```
#[derive(Clone)]
pub struct KeyOrder(Comparator);

impl KeyOrder {
    #[must_use]
    pub fn natural() -> Self {
        KeyOrder(Arc::new(natural_cmp))
    }

    /// Plain byte order.
    #[must_use]
    pub fn lexicographic() -> Self {
        KeyOrder(Arc::new(|a: &[u8], b: &[u8]| a.cmp(b)))
    }

    pub fn custom<F>(compare: F) -> Self
    where
        F: Fn(&[u8], &[u8]) -> Ordering + Send + Sync + 'static,
    {
        KeyOrder(Arc::new(compare))
    }

    #[must_use]
    pub fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        (self.0)(a, b)
    }
}

impl Default for KeyOrder {
    fn default() -> Self {
        KeyOrder::natural()
    }
}

impl fmt::Debug for KeyOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyOrder")
    }
}

/// Natural comparison of two keys. Invalid UTF-8 is compared after lossy
/// decoding.
///
/// ```rust
/// use serde_linecoder::collate::natural_cmp;
/// use std::cmp::Ordering;
///
/// assert_eq!(natural_cmp(b"File2", b"file10"), Ordering::Less);
/// assert_eq!(natural_cmp("résumé".as_bytes(), b"resume2"), Ordering::Less);
/// ```
#[must_use]
pub fn natural_cmp(a: &[u8], b: &[u8]) -> Ordering {
    let left = String::from_utf8_lossy(a);
    let right = String::from_utf8_lossy(b);
    compare_folded(&mut left.chars().peekable(), &mut right.chars().peekable())
        .then_with(|| a.cmp(b))
}

fn compare_folded(left: &mut Peekable<Chars<'_>>, right: &mut Peekable<Chars<'_>>) -> Ordering {
    loop {
        let (l, r) = match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => (fold(l), fold(r)),
        };

        if l.is_ascii_digit() && r.is_ascii_digit() {
            let ordering = compare_numbers(&take_digits(left), &take_digits(right));
            if ordering != Ordering::Equal {
                return ordering;
            }
            continue;
        }

        left.next();
        right.next();
        match l.cmp(&r) {
            Ordering::Equal => {}
            unequal => return unequal,
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(&c) = chars.peek() {
        let folded = fold(c);
        if !folded.is_ascii_digit() {
            break;
        }
        digits.push(folded);
        chars.next();
    }
    digits
}

fn compare_numbers(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Maps a character to its comparison form: fullwidth to ASCII, Latin-1
/// letters to their base letter, then lowercase.
fn fold(c: char) -> char {
    let c = match c as u32 {
        0xFF01..=0xFF5E => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
        _ => c,
    };
    let base = match c {
        'À'..='Å' | 'à'..='å' => 'a',
        'Ç' | 'ç' => 'c',
        'È'..='Ë' | 'è'..='ë' => 'e',
        'Ì'..='Ï' | 'ì'..='ï' => 'i',
        'Ñ' | 'ñ' => 'n',
        'Ò'..='Ö' | 'Ø' | 'ò'..='ö' | 'ø' => 'o',
        'Ù'..='Ü' | 'ù'..='ü' => 'u',
        'Ý' | 'ý' | 'ÿ' => 'y',
        other => other,
    };
    base.to_lowercase().next().unwrap_or(base)
}
