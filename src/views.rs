//! HTML rendering for the single page

use crate::assets::Background;
use crate::models::{Choice, StudentProfile, Verdict};

pub const PAGE_TITLE: &str = "Placement Eligibility Predictor";
pub const PAGE_ICON: &str = "🎓";
pub const HEADING: &str = "UGANDA UNIVERSITY";
pub const TAGLINE: &str = "🔍 AI-powered tool to check student placement eligibility.";
pub const SUBHEADER: &str = "📊 Enter Student Details:";
pub const BUTTON_LABEL: &str = "🔮 Predict";

/// What appears under the Predict button
#[derive(Debug, Clone)]
pub enum Banner {
    Verdict(Verdict),
    Error(String),
}

/// Minimal HTML escaping for text and attribute values
pub fn escape(text: &str) -> String {
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

/// Page with the form, optionally followed by a verdict or error banner
pub fn render_form_page(
    background: Option<&Background>,
    profile: &StudentProfile,
    banner: Option<&Banner>,
) -> String {
    let mut html = page_start(background);

    html.push_str(&format!("<p class='tagline'>{}</p>\n", TAGLINE));
    html.push_str(&format!("<h3>{}</h3>\n", SUBHEADER));
    html.push_str("<form method='post' action='/'>\n<div class='columns'>\n");

    html.push_str("<div class='column'>\n");
    html.push_str(&number_input("📚 CGPA", "cgpa", profile.cgpa, 0.0, 10.0, "0.1"));
    html.push_str(&number_input("💼 Internships", "internships", profile.internships, 0, 10, "1"));
    html.push_str(&number_input("🛠️ Projects", "projects", profile.projects, 0, 10, "1"));
    html.push_str(&number_input("📜 Certifications", "certifications", profile.certifications, 0, 10, "1"));
    html.push_str(&number_input("🧠 Aptitude Score", "aptitude_score", profile.aptitude_score, 0, 100, "1"));
    html.push_str("</div>\n");

    html.push_str("<div class='column'>\n");
    html.push_str(&number_input("⭐ Skill Rating", "skill_rating", profile.skill_rating, 0.0, 10.0, "0.1"));
    html.push_str(&select("🎭 Extra Activities", "extra_curricular", profile.extra_curricular));
    html.push_str(&select("🎓 Placement Training", "placement_training", profile.placement_training));
    html.push_str(&number_input("🏫 SSC Marks (%)", "ssc_marks", profile.ssc_marks, 0, 100, "1"));
    html.push_str(&number_input("🏛️ HSC Marks (%)", "hsc_marks", profile.hsc_marks, 0, 100, "1"));
    html.push_str("</div>\n");

    html.push_str("</div>\n");
    html.push_str(&format!("<button type='submit' class='predict'>{}</button>\n", BUTTON_LABEL));
    html.push_str("</form>\n");

    match banner {
        Some(Banner::Verdict(verdict)) => {
            html.push_str(&format!("<div class='result'>{}</div>\n", verdict.label()));
        }
        Some(Banner::Error(message)) => {
            html.push_str(&format!("<div class='error'>{}</div>\n", escape(message)));
        }
        None => {}
    }

    page_end(html)
}

/// Page halted by an artifact error: header and message, no form
pub fn render_fatal_page(background: Option<&Background>, message: &str) -> String {
    let mut html = page_start(background);
    html.push_str(&format!("<div class='error fatal'>{}</div>\n", escape(message)));
    page_end(html)
}

fn number_input<T: std::fmt::Display>(
    label: &str,
    name: &str,
    value: T,
    min: T,
    max: T,
    step: &str,
) -> String {
    format!(
        "<label for='{name}'>{label}</label>\n\
         <input type='number' id='{name}' name='{name}' value='{value}' min='{min}' max='{max}' step='{step}' required>\n"
    )
}

fn select(label: &str, name: &str, selected: Choice) -> String {
    let mut html = format!("<label for='{name}'>{label}</label>\n<select id='{name}' name='{name}'>\n");
    for choice in Choice::ALL {
        let marker = if choice == selected { " selected" } else { "" };
        html.push_str(&format!(
            "<option value='{v}'{marker}>{v}</option>\n",
            v = choice.as_str()
        ));
    }
    html.push_str("</select>\n");
    html
}

fn page_start(background: Option<&Background>) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang='en'>\n<head>\n");
    html.push_str("<meta charset='utf-8'>\n");
    html.push_str("<meta name='viewport' content='width=device-width, initial-scale=1'>\n");
    html.push_str(&format!("<title>{}</title>\n", PAGE_TITLE));
    html.push_str(&format!(
        "<link rel='icon' href=\"data:image/svg+xml,<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'><text y='.9em' font-size='90'>{}</text></svg>\">\n",
        PAGE_ICON
    ));
    html.push_str("<style>\n");
    if let Some(bg) = background {
        html.push_str(&format!(
            "body {{ background-image: url(\"{}\"); background-size: cover; background-position: center; background-repeat: no-repeat; background-attachment: fixed; }}\n",
            bg.data_uri
        ));
    } else {
        html.push_str("body { background: linear-gradient(135deg, #1d2b64, #3a6073); }\n");
    }
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n");
    html.push_str("<main class='main-container'>\n");
    html.push_str(&format!("<h1 class='title'>{}</h1>\n", HEADING));
    html
}

fn page_end(mut html: String) -> String {
    html.push_str("</main>\n</body>\n</html>\n");
    html
}

const STYLE: &str = "\
body { margin: 0; min-height: 100vh; font-family: 'Segoe UI', Arial, sans-serif; color: white; }
.main-container { background: rgba(255, 255, 255, 0.15); backdrop-filter: blur(12px); padding: 30px; border-radius: 15px; box-shadow: 5px 5px 20px rgba(0, 0, 0, 0.3); max-width: 700px; margin: 40px auto; }
.title { color: #ffffff; text-align: center; font-size: 32px; font-weight: bold; }
.columns { display: flex; gap: 24px; flex-wrap: wrap; }
.column { flex: 1; min-width: 240px; display: flex; flex-direction: column; }
label { margin-top: 12px; margin-bottom: 4px; font-weight: bold; }
input, select { background: rgba(255, 255, 255, 0.2); backdrop-filter: blur(10px); border: none; border-radius: 10px; padding: 8px; color: white; font-weight: bold; }
select option { color: black; }
::placeholder { color: white; }
.predict { margin-top: 20px; background-color: #28a745; color: white; font-size: 18px; border: none; border-radius: 10px; padding: 10px 20px; transition: 0.3s; cursor: pointer; }
.predict:hover { background-color: #218838; transform: scale(1.05); }
.result { margin-top: 20px; background-color: rgba(255, 255, 255, 0.2); padding: 15px; border-radius: 10px; font-size: 20px; font-weight: bold; text-align: center; }
.error { margin-top: 20px; background-color: rgba(220, 53, 69, 0.35); padding: 15px; border-radius: 10px; font-weight: bold; }
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_page_has_ten_controls_and_button() {
        let html = render_form_page(None, &StudentProfile::default(), None);

        assert!(html.contains("<title>Placement Eligibility Predictor</title>"));
        assert!(html.contains("UGANDA UNIVERSITY"));
        assert_eq!(html.matches("<input type='number'").count(), 8);
        assert_eq!(html.matches("<select").count(), 2);
        assert!(html.contains("🔮 Predict"));
        assert!(!html.contains("class='result'"));
    }

    #[test]
    fn test_form_page_declares_bounds_and_defaults() {
        let html = render_form_page(None, &StudentProfile::default(), None);

        assert!(html.contains("name='cgpa' value='7' min='0' max='10' step='0.1'"));
        assert!(html.contains("name='aptitude_score' value='50' min='0' max='100' step='1'"));
        assert!(html.contains("name='ssc_marks' value='75' min='0' max='100'"));
        assert!(html.contains("<option value='YES' selected>YES</option>"));
    }

    #[test]
    fn test_form_page_keeps_submitted_values() {
        let profile = StudentProfile {
            cgpa: 8.7,
            extra_curricular: Choice::No,
            ..StudentProfile::default()
        };
        let html = render_form_page(None, &profile, Some(&Banner::Verdict(Verdict::Eligible)));

        assert!(html.contains("name='cgpa' value='8.7'"));
        assert!(html.contains("<option value='NO' selected>NO</option>"));
        assert!(html.contains("<div class='result'>Eligible for Placement ✅</div>"));
    }

    #[test]
    fn test_fatal_page_has_no_form() {
        let html = render_fatal_page(None, "⚠️ Error loading model: <bad> & worse");

        assert!(!html.contains("<form"));
        assert!(html.contains("Error loading model: &lt;bad&gt; &amp; worse"));
    }

    #[test]
    fn test_background_inlined() {
        let bg = Background::from_bytes(b"img", "image/webp");
        let html = render_form_page(Some(&bg), &StudentProfile::default(), None);
        assert!(html.contains("url(\"data:image/webp;base64,aW1n\")"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a<b>'c'&\"d\""), "a&lt;b&gt;&#39;c&#39;&amp;&quot;d&quot;");
    }
}
