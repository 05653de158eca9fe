//! `${key}` templates for header, list item and inserted text
//!
//! Templates are parsed once per config into literal and placeholder
//! segments. Placeholders are filled from candidate fields; display output
//! escapes HTML, insert output does not (it goes in as text).

use super::candidate::Candidate;
use super::config::TriggerConfig;

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// Whether interpolated values are HTML-escaped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escape {
    Html,
    None,
}

/// A parsed `${key}` template
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = source;

        while let Some(open) = rest.find("${") {
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            let after = &rest[open + 2..];
            let close = after
                .find('}')
                .ok_or_else(|| TemplateError::Unterminated(source.to_string()))?;
            segments.push(Segment::Placeholder(after[..close].trim().to_string()));
            rest = &after[close + 1..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self { segments })
    }

    /// Keys referenced by the template, in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(key) => Some(key.as_str()),
            Segment::Literal(_) => None,
        })
    }

    pub fn render(&self, candidate: &Candidate, escape: Escape) -> Result<String, TemplateError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(key) => {
                    if candidate.field(key).is_none() {
                        return Err(TemplateError::MissingField(key.clone()));
                    }
                    let value = candidate
                        .text(key)
                        .ok_or_else(|| TemplateError::NonScalarField(key.clone()))?;
                    match escape {
                        Escape::Html => out.push_str(&escape_html(&value)),
                        Escape::None => out.push_str(&value),
                    }
                }
            }
        }
        Ok(out)
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// =============================================================================
// TemplateConfig
// =============================================================================

/// Parsed templates for one trigger
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateConfig {
    pub header: String,
    pub display: Template,
    pub insert: Template,
}

impl TemplateConfig {
    pub fn from_trigger(config: &TriggerConfig) -> Result<Self, TemplateError> {
        Ok(Self {
            header: config.header_tpl.clone(),
            display: Template::parse(&config.display_tpl)?,
            insert: Template::parse(&config.insert_tpl)?,
        })
    }

    /// List item markup for a candidate
    pub fn display(&self, candidate: &Candidate) -> Result<String, TemplateError> {
        self.display.render(candidate, Escape::Html)
    }

    /// Text inserted into the editor when a candidate is picked
    pub fn insert(&self, candidate: &Candidate) -> Result<String, TemplateError> {
        self.insert.render(candidate, Escape::None)
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Template errors
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateError {
    MissingField(String),
    NonScalarField(String),
    Unterminated(String),
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(key) => write!(f, "Candidate has no field '{}'", key),
            Self::NonScalarField(key) => write!(f, "Candidate field '{}' is not a scalar", key),
            Self::Unterminated(tpl) => write!(f, "Unterminated placeholder in template: {}", tpl),
        }
    }
}

impl std::error::Error for TemplateError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn jane() -> Candidate {
        Candidate::new("u1").with_field("fullName", "Jane Doe")
    }

    #[test]
    fn test_insert_template() {
        let tpl = Template::parse("@${fullName}").unwrap();
        assert_eq!(tpl.render(&jane(), Escape::None).unwrap(), "@Jane Doe");
    }

    #[test]
    fn test_display_escapes_html() {
        let tpl = Template::parse("<li>${fullName}</li>").unwrap();
        let sneaky = Candidate::new("u9").with_field("fullName", "<b>Bob</b> & \"Al\"");
        assert_eq!(
            tpl.render(&sneaky, Escape::Html).unwrap(),
            "<li>&lt;b&gt;Bob&lt;/b&gt; &amp; &quot;Al&quot;</li>"
        );
    }

    #[test]
    fn test_multiple_placeholders_and_id() {
        let tpl = Template::parse("${fullName} (${id}) ${ age }").unwrap();
        let c = jane().with_field("age", 42);
        assert_eq!(tpl.keys().collect::<Vec<_>>(), vec!["fullName", "id", "age"]);
        assert_eq!(tpl.render(&c, Escape::None).unwrap(), "Jane Doe (u1) 42");
    }

    #[test]
    fn test_no_placeholders() {
        let tpl = Template::parse("plain $ text {}").unwrap();
        assert_eq!(tpl.render(&jane(), Escape::Html).unwrap(), "plain $ text {}");
    }

    #[test]
    fn test_missing_field() {
        let tpl = Template::parse("@${username}").unwrap();
        assert_eq!(
            tpl.render(&jane(), Escape::None),
            Err(TemplateError::MissingField("username".to_string()))
        );
    }

    #[test]
    fn test_non_scalar_field() {
        let tpl = Template::parse("${tags}").unwrap();
        let c = jane().with_field("tags", json!(["a", "b"]));
        assert_eq!(
            tpl.render(&c, Escape::None),
            Err(TemplateError::NonScalarField("tags".to_string()))
        );
    }

    #[test]
    fn test_unterminated() {
        assert!(matches!(
            Template::parse("@${fullName"),
            Err(TemplateError::Unterminated(_))
        ));
    }

    #[test]
    fn test_template_config_from_presets() {
        let templates = TemplateConfig::from_trigger(&TriggerConfig::plus()).unwrap();
        assert_eq!(templates.display(&jane()).unwrap(), "<li>Jane Doe</li>");
        assert_eq!(templates.insert(&jane()).unwrap(), "+Jane Doe");
        assert!(templates.header.contains("Contributors"));
    }
}
