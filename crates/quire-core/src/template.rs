//! Positional substitution for message templates.
//!
//! Supported placeholders: `%s` and `%d` take the next context value, `%N$s`
//! (or `%N$d`) takes value `N` counting from one, and `%%` is a literal percent
//! sign. A placeholder without a matching value is copied through verbatim.

/// Substitute `context` values into `template`.
#[must_use]
pub fn render_template(template: &str, context: &[String]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut next_sequential = 0_usize;
    let mut rest = template;

    while let Some(offset) = rest.find('%') {
        output.push_str(&rest[..offset]);
        let tail = &rest[offset + 1..];

        if let Some(after) = tail.strip_prefix('%') {
            output.push('%');
            rest = after;
            continue;
        }

        if let Some(after) = tail.strip_prefix(['s', 'd']) {
            match context.get(next_sequential) {
                Some(value) => output.push_str(value),
                None => output.push_str(&rest[offset..offset + 2]),
            }
            next_sequential += 1;
            rest = after;
            continue;
        }

        if let Some((index, consumed)) = positional(tail) {
            match index.checked_sub(1).and_then(|slot| context.get(slot)) {
                Some(value) => output.push_str(value),
                None => output.push_str(&rest[offset..=offset + consumed]),
            }
            rest = &tail[consumed..];
            continue;
        }

        output.push('%');
        rest = tail;
    }

    output.push_str(rest);
    output
}

/// Parses `N$s` / `N$d` at the start of `tail`, returning the index and the
/// number of bytes consumed.
fn positional(tail: &str) -> Option<(usize, usize)> {
    let digits = tail.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let suffix = tail.get(digits..digits + 2)?;
    if suffix != "$s" && suffix != "$d" {
        return None;
    }
    let index = tail[..digits].parse().ok()?;
    Some((index, digits + 2))
}
