//! Markup escaping for preview output
//!
//! Escapes `&`, `<`, `>`, `"` and `'`. An `&` that already begins a character
//! reference (`&amp;`, `&#39;`, `&#x27;`) is left alone so content that was
//! escaped upstream is not escaped twice.

use regex::Regex;

#[derive(Debug, Clone)]
pub struct Escaper {
    entity_re: Regex,
}

impl Default for Escaper {
    fn default() -> Self {
        Self::new()
    }
}

impl Escaper {
    pub fn new() -> Self {
        // &name; | &#123; | &#x1F;
        let entity_re = Regex::new(concat!(
            r"^&(?:[A-Za-z][A-Za-z0-9]{1,31}",
            r"|#[0-9]{1,7}",
            r"|#[xX][0-9A-Fa-f]{1,6});",
        ))
        .expect("Entity regex should compile");
        Self { entity_re }
    }

    pub fn escape(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        self.escape_into(&mut out, text);
        out
    }

    /// Append the escaped form of `text` to `out`
    pub fn escape_into(&self, out: &mut String, text: &str) {
        for (i, ch) in text.char_indices() {
            match ch {
                '&' if self.entity_re.is_match(&text[i..]) => out.push('&'),
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&#39;"),
                _ => out.push(ch),
            }
        }
    }
}
