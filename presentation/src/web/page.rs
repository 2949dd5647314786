//! HTML for the consultation form
//!
//! Every user-supplied or model-generated string goes through `html-escape`
//! before it reaches the page.

use crate::form::{AGE, DISEASE, FORM_DESCRIPTION, FORM_TITLE, FormField, GENDER};
use health_crew_domain::ConsultationRequest;
use html_escape::{encode_double_quoted_attribute, encode_text};

pub enum Outcome<'a> {
    Report(&'a str),
    Error(&'a str),
}

fn input(field: &FormField, value: &str) -> String {
    format!(
        "<label>{label}<br><input type=\"text\" name=\"{name}\" value=\"{value}\"></label>",
        label = encode_text(field.label),
        name = field.name,
        value = encode_double_quoted_attribute(value),
    )
}

/// The form, pre-filled with `request`, followed by the outcome if any.
pub fn render(request: &ConsultationRequest, outcome: Option<Outcome<'_>>) -> String {
    let result = match outcome {
        Some(Outcome::Report(report)) => {
            format!("<h2>Result</h2>\n<pre class=\"report\">{}</pre>", encode_text(report))
        }
        Some(Outcome::Error(message)) => {
            format!("<h2>Error</h2>\n<pre class=\"error\">{}</pre>", encode_text(message))
        }
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; max-width: 48rem; margin: 2rem auto; }}
label {{ display: block; margin-bottom: 0.75rem; }}
input[type=text] {{ width: 100%; padding: 0.4rem; }}
pre {{ white-space: pre-wrap; background: #f4f4f4; padding: 1rem; }}
pre.error {{ background: #fbe9e9; }}
</style>
</head>
<body>
<h1>{title}</h1>
<p>{description}</p>
<form method="post" action="/consult">
{age}
{gender}
{disease}
<button type="submit">Submit</button>
</form>
{result}
</body>
</html>
"#,
        title = encode_text(FORM_TITLE),
        description = encode_text(FORM_DESCRIPTION),
        age = input(&AGE, &request.age),
        gender = input(&GENDER, &request.gender),
        disease = input(&DISEASE, &request.disease_indicator),
    )
}
