//! Positional `sprintf`-style substitution.
//!
//! Implements the placeholder grammar translators already use in message
//! files: `%[N$][+]['c|0][-][width][.precision]type`, with `%%` as a literal
//! percent sign.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Too few args | `%s` with no argument left | Placeholder left as-is |
//! | Bad index | `%3$s` with two arguments | Placeholder left as-is |
//! | Unknown type | `%q` | Emitted literally |
//! | Oversized field | `%.70000f` | Emitted literally |
//! | Non-numeric arg | `%d` with `"abc"` | Renders `NaN` |

use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

/// A substitution argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Str(String),
    Int(i64),
    Float(f64),
}

impl Arg {
    /// Integer value using leading-integer parse semantics.
    ///
    /// Floats truncate toward zero; strings parse an optionally signed run of
    /// decimal digits after leading whitespace (`"12px"` is 12). Returns
    /// `None` for anything that is not a number.
    #[must_use]
    pub fn to_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            Self::Float(_) => None,
            Self::Str(s) => parse_leading_int(s),
        }
    }

    /// Floating point value using leading-float parse semantics.
    #[must_use]
    pub fn to_float(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(f) if f.is_nan() => None,
            Self::Float(f) => Some(*f),
            Self::Str(s) => parse_leading_float(s),
        }
    }

    fn to_json(&self) -> String {
        let value = match self {
            Self::Str(s) => serde_json::Value::from(s.as_str()),
            Self::Int(n) => serde_json::Value::from(*n),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
        };
        value.to_string()
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => f.write_str(&number_to_string(*x)),
        }
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for Arg {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

macro_rules! arg_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Arg {
            fn from(value: $t) -> Self {
                Self::Int(i64::from(value))
            }
        })*
    };
}

arg_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Arg {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or(Self::Float(value as f64), Self::Int)
    }
}

impl From<usize> for Arg {
    fn from(value: usize) -> Self {
        i64::try_from(value).map_or(Self::Float(value as f64), Self::Int)
    }
}

impl From<f32> for Arg {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Build an argument list from heterogeneous values.
///
/// ```
/// use lingo_i18n::{args, format::vsprintf};
///
/// assert_eq!(vsprintf("%s has %d items", &args!["cart", 3]), "cart has 3 items");
/// ```
#[macro_export]
macro_rules! args {
    () => { ::std::vec::Vec::<$crate::format::Arg>::new() };
    ($($value:expr),+ $(,)?) => {
        vec![$($crate::format::Arg::from($value)),+]
    };
}

/// Largest width or precision a placeholder may carry.
const MAX_FIELD: usize = u16::MAX as usize;

#[derive(Debug, Clone, Copy)]
struct Spec {
    index: Option<usize>,
    plus: bool,
    pad: char,
    left: bool,
    width: usize,
    precision: Option<usize>,
    kind: char,
}

/// Substitute `args` into `template`.
#[must_use]
pub fn vsprintf(template: &str, args: &[Arg]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut next_arg = 0;
    let mut rest = template;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(tail) = after.strip_prefix('%') {
            out.push('%');
            rest = tail;
            continue;
        }

        let Some((spec, consumed)) = parse_spec(after) else {
            out.push('%');
            rest = after;
            continue;
        };

        let placeholder = &rest[pos..pos + 1 + consumed];
        let arg = match spec.index {
            Some(n) => n.checked_sub(1).and_then(|i| args.get(i)),
            None => {
                let arg = args.get(next_arg);
                next_arg += 1;
                arg
            }
        };
        match arg {
            Some(arg) => out.push_str(&render(&spec, arg)),
            None => out.push_str(placeholder),
        }
        rest = &after[consumed..];
    }

    out.push_str(rest);
    out
}

/// Parse a placeholder body (the text after `%`). Returns the spec and the
/// number of bytes it spans.
fn parse_spec(body: &str) -> Option<(Spec, usize)> {
    let mut chars = body.char_indices().peekable();

    let checkpoint = chars.clone();
    let number = read_number(&mut chars);
    let index = if number.is_some() && chars.next_if(|&(_, c)| c == '$').is_some() {
        number
    } else {
        chars = checkpoint;
        None
    };

    let plus = chars.next_if(|&(_, c)| c == '+').is_some();
    let mut pad = ' ';
    if chars.next_if(|&(_, c)| c == '0').is_some() {
        pad = '0';
    } else if chars.next_if(|&(_, c)| c == '\'').is_some() {
        pad = chars.next()?.1;
    }
    let left = chars.next_if(|&(_, c)| c == '-').is_some();
    let width = read_number(&mut chars).unwrap_or(0);
    let precision = if chars.next_if(|&(_, c)| c == '.').is_some() {
        Some(read_number(&mut chars)?)
    } else {
        None
    };
    if width > MAX_FIELD || precision.is_some_and(|p| p > MAX_FIELD) {
        return None;
    }

    let (at, kind) = chars.next()?;
    if !matches!(
        kind,
        'b' | 'c' | 'd' | 'i' | 'e' | 'f' | 'j' | 'o' | 's' | 'u' | 'x' | 'X'
    ) {
        return None;
    }

    let spec = Spec {
        index,
        plus,
        pad,
        left,
        width,
        precision,
        kind,
    };
    Some((spec, at + kind.len_utf8()))
}

fn read_number(chars: &mut Peekable<CharIndices<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some((_, c)) = chars.next_if(|&(_, c)| c.is_ascii_digit()) {
        let digit = c.to_digit(10).unwrap_or_default() as usize;
        value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(digit));
    }
    value
}

fn render(spec: &Spec, arg: &Arg) -> String {
    let (negative, body) = match spec.kind {
        'd' | 'i' => match arg.to_int() {
            Some(n) => (n < 0, n.unsigned_abs().to_string()),
            None => (false, "NaN".to_owned()),
        },
        'f' => match arg.to_float() {
            Some(x) => {
                let text = match spec.precision {
                    Some(p) => format!("{:.*}", p, x.abs()),
                    None => number_to_string(x.abs()),
                };
                (x.is_sign_negative() && x != 0.0, text)
            }
            None => (false, "NaN".to_owned()),
        },
        'e' => match arg.to_float() {
            Some(x) => (x.is_sign_negative() && x != 0.0, exponential(x.abs(), spec.precision)),
            None => (false, "NaN".to_owned()),
        },
        'u' => (false, to_uint32(arg).to_string()),
        'b' => (false, format!("{:b}", to_uint32(arg))),
        'o' => (false, format!("{:o}", to_uint32(arg))),
        'x' => (false, format!("{:x}", to_uint32(arg))),
        'X' => (false, format!("{:X}", to_uint32(arg))),
        'c' => (
            false,
            arg.to_int()
                .and_then(|n| u32::try_from(n).ok())
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_default(),
        ),
        'j' => (false, arg.to_json()),
        _ => {
            let text = arg.to_string();
            let text = match spec.precision {
                Some(p) => text.chars().take(p).collect(),
                None => text,
            };
            (false, text)
        }
    };

    let numeric = matches!(spec.kind, 'd' | 'i' | 'e' | 'f');
    let sign = if !numeric {
        ""
    } else if negative {
        "-"
    } else if spec.plus && body != "NaN" {
        "+"
    } else {
        ""
    };

    let len = sign.chars().count() + body.chars().count();
    let padding: String = std::iter::repeat_n(spec.pad, spec.width.saturating_sub(len)).collect();
    if spec.left {
        format!("{sign}{body}{padding}")
    } else if spec.pad == '0' {
        format!("{sign}{padding}{body}")
    } else {
        format!("{padding}{sign}{body}")
    }
}

fn to_uint32(arg: &Arg) -> u32 {
    // Wraps modulo 2^32; non-numbers become zero.
    arg.to_int().map_or(0, |n| n as u32)
}

fn exponential(x: f64, precision: Option<usize>) -> String {
    let raw = match precision {
        Some(p) => format!("{:.*e}", p, x),
        None => format!("{x:e}"),
    };
    match raw.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => raw,
    }
}

/// Shortest display of a float, without a trailing `.0` for integral values.
fn number_to_string(x: f64) -> String {
    if x.is_nan() {
        "NaN".to_owned()
    } else if x.is_infinite() {
        let text = if x > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_owned()
    } else if x == 0.0 {
        "0".to_owned()
    } else if x.fract() == 0.0 && x.abs() < 1e21 {
        format!("{x:.0}")
    } else {
        format!("{x}")
    }
}

fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() {
        return None;
    }
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let end = s
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
        .unwrap_or(s.len());
    let candidate = &s[..end];
    // Longest prefix that is a valid float, e.g. "1.5e" -> "1.5".
    (1..=candidate.len())
        .rev()
        .find_map(|len| candidate[..len].parse::<f64>().ok())
}
