pub mod pages;
pub mod text;
pub mod views;

pub use pages::{badges_page, home_page, profile_page, StaticPage};
pub use text::match_text;
pub use views::{OpponentView, ProfileView};

use serde::Serialize;

use crate::config::settings::SiteSettings;

const STYLESHEET: &str = "body{font-family:'Roboto Mono',monospace;margin:0 auto;\
max-width:64rem;padding:1rem}\
table{border-collapse:collapse;width:100%}th,td{padding:.25rem .5rem;text-align:left}\
tr:nth-child(even){background:#f3f3f3}.badge{display:inline-block;border:1px solid #333;\
border-radius:.5rem;margin:.25rem;padding:.25rem .5rem}.secret{opacity:.6}\
.profile-image{border-radius:50%;height:6rem;width:6rem;object-fit:cover}";

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// 1st, 2nd, 3rd, 4th, 11th, 21st ...
pub fn ordinal(n: i64) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

/// JSON that is safe to embed in a `<script>` element
pub fn script_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// Wraps page content in the site layout
pub fn shell(
    site: &SiteSettings,
    title: Option<&str>,
    body: &str,
    data_json: Option<&str>,
) -> String {
    let full_title = match title {
        Some(t) => format!("{} | {}", escape_html(t), site.title),
        None => site.title.to_string(),
    };
    let data = data_json
        .map(|json| format!("<script type=\"application/json\" id=\"data\">{}</script>\n", json))
        .unwrap_or_default();

    format!(
        "<!DOCTYPE html>\n\
<html lang=\"en\">\n\
<head>\n\
<meta charset=\"utf-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
<title>{title}</title>\n\
<link rel=\"canonical\" href=\"{base}\">\n\
<style>{style}</style>\n\
</head>\n\
<body>\n\
<header><a href=\"{base}/\">{site}</a> · \
<a href=\"{base}/rating-system.html\">Rating System</a> · \
<a href=\"{base}/badges.html\">Badges</a></header>\n\
<main>\n{body}\n</main>\n\
{data}</body>\n\
</html>\n",
        title = full_title,
        base = site.base_url,
        style = STYLESHEET,
        site = site.title,
        body = body,
        data = data,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>Tom & \"Jerry\"</b>"),
            "&lt;b&gt;Tom &amp; &quot;Jerry&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_ordinal() {
        let got: Vec<String> = [1, 2, 3, 4, 11, 12, 13, 21, 22, 101, 111]
            .iter()
            .map(|&n| ordinal(n))
            .collect();

        assert_eq!(
            got,
            vec![
                "1st", "2nd", "3rd", "4th", "11th", "12th", "13th", "21st", "22nd", "101st",
                "111th"
            ]
        );
    }

    #[test]
    fn test_script_json_cannot_close_tag() {
        let json = script_json(&vec!["</script><script>alert(1)"]).unwrap();

        assert!(!json.contains("</script>"));
    }

    #[test]
    fn test_shell_titles() {
        let site = SiteSettings::default();

        let home = shell(&site, None, "<p>hi</p>", None);
        let page = shell(&site, Some("A & B"), "", Some("{}"));

        assert!(home.contains("<title>Axe Charts</title>"));
        assert!(page.contains("<title>A &amp; B | Axe Charts</title>"));
        assert!(page.contains("id=\"data\">{}</script>"));
    }
}
