//! `Exec` key quoting
//!
//! Arguments are separated by spaces. An argument containing reserved characters is
//! enclosed in double quotes, and inside quotes `"`, `` ` ``, `$` and `\` are escaped
//! with a backslash. A literal `%` is written as `%%`; other `%x` sequences are field
//! codes that launchers expand.

/// Characters that force an argument to be quoted
const RESERVED: &[char] = &[
    ' ', '\t', '\n', '"', '\'', '\\', '>', '<', '~', '|', '&', ';', '$', '*', '?', '#', '(', ')',
    '`',
];

/// Field codes recognised by desktop launchers
const FIELD_CODES: &[char] = &['f', 'F', 'u', 'U', 'd', 'D', 'n', 'N', 'i', 'c', 'k', 'v', 'm'];

/// Split an (already unescaped) `Exec` value into words.
pub fn split(exec: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = exec.chars();

    while let Some(c) = chars.next() {
        match c {
            ' ' | '\t' => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(escaped) => current.push(escaped),
                            None => return Err("unterminated escape in Exec".to_string()),
                        },
                        Some(other) => current.push(other),
                        None => return Err("unterminated quote in Exec".to_string()),
                    }
                }
            }
            other => {
                in_word = true;
                current.push(other);
            }
        }
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// Drop field-code arguments and decode `%%`, leaving what should be passed to the program
pub fn strip_field_codes(args: &[String]) -> Vec<String> {
    args.iter()
        .filter(|arg| !is_field_code(arg))
        .map(|arg| arg.replace("%%", "%"))
        .collect()
}

fn is_field_code(arg: &str) -> bool {
    let mut chars = arg.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some('%'), Some(code), None) if FIELD_CODES.contains(&code)
    )
}

/// Quote one argument for an `Exec` value
pub fn quote_arg(arg: &str) -> String {
    let arg = arg.replace('%', "%%");
    if !arg.is_empty() && !arg.contains(RESERVED) {
        return arg;
    }

    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        if matches!(c, '"' | '`' | '$' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Join a program and its arguments into an `Exec` value
pub fn join<I, S>(words: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words
        .into_iter()
        .map(|w| quote_arg(w.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}
