//! HTML dashboard renderer.
//!
//! Produces a self-contained HTML page with all CSS inlined. Each course gets
//! section progress bars, an SVG winding road through its pathway, and a
//! leaderboard table.

use anyhow::Result;
use serde_json::Value;

use crate::context::TemplateContext;
use crate::render::Renderer;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn text(value: &Value, key: &str) -> String {
    html_escape(value[key].as_str().unwrap_or(""))
}

fn number(value: &Value, key: &str) -> f64 {
    value[key].as_f64().unwrap_or(0.0)
}

fn items(value: &Value, key: &str) -> Vec<Value> {
    value[key].as_array().cloned().unwrap_or_default()
}

/// Renders a dashboard context as a standalone HTML page.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    /// Append the raw context as collapsible JSON at the end of the page.
    pub include_raw_json: bool,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self {
            include_raw_json: true,
        }
    }
}

impl Renderer for HtmlRenderer {
    fn name(&self) -> &str {
        "html"
    }

    fn file_extension(&self) -> &str {
        "html"
    }

    fn render(&self, context: &TemplateContext) -> Result<String> {
        Ok(self.generate(context))
    }
}

impl HtmlRenderer {
    fn generate(&self, ctx: &TemplateContext) -> String {
        let mut html = String::new();
        let learner = html_escape(ctx.str("learner_name"));

        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
        html.push_str(&format!("<title>trailmap · {learner}</title>\n"));
        html.push_str("<style>\n");
        html.push_str(CSS);
        html.push_str("</style>\n");
        html.push_str("</head>\n<body>\n");

        // Header
        let overall = ctx.get("overall").cloned().unwrap_or(Value::Null);
        html.push_str("<header>\n");
        html.push_str(&format!("<h1>{learner}</h1>\n"));
        html.push_str(&format!(
            "<p class=\"meta\">Dataset: <strong>{}</strong> | overall {}% ({}) | {}</p>\n",
            html_escape(ctx.str("dataset_id")),
            number(&overall, "percentage"),
            text(&overall, "progress_label"),
            html_escape(ctx.str("generated_at")),
        ));
        html.push_str("</header>\n");

        let courses = ctx
            .get("courses")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        if courses.is_empty() {
            html.push_str("<p class=\"meta\">No courses.</p>\n");
        }
        for course in &courses {
            html.push_str(&course_section(course));
        }

        if self.include_raw_json {
            html.push_str("<section class=\"raw-data\">\n");
            html.push_str("<details>\n<summary>Template context</summary>\n");
            html.push_str("<pre><code>");
            html.push_str(&html_escape(
                &serde_json::to_string_pretty(ctx).unwrap_or_default(),
            ));
            html.push_str("</code></pre>\n");
            html.push_str("</details>\n</section>\n");
        }

        html.push_str("</body>\n</html>");
        html
    }
}

fn course_section(course: &Value) -> String {
    let mut html = String::new();
    html.push_str(&format!(
        "<section class=\"course status-{}\">\n",
        text(course, "status")
    ));
    html.push_str(&format!(
        "<h2>{} <span class=\"pct\">{}%</span></h2>\n",
        text(course, "name"),
        number(course, "percentage")
    ));
    html.push_str(&format!(
        "<p class=\"meta\">{} · {}</p>\n",
        text(course, "progress_label"),
        text(&course["standing"], "label")
    ));

    html.push_str(&section_bars(&items(course, "sections")));

    let pathway = items(course, "pathway");
    if !pathway.is_empty() {
        html.push_str(&winding_road(&pathway));
    }

    html.push_str(&leaderboard_table(&items(course, "leaderboard")));
    html.push_str("</section>\n");
    html
}

fn section_bars(sections: &[Value]) -> String {
    let mut html = String::from("<div class=\"sections\">\n");
    for section in sections {
        let pct = number(section, "percentage");
        html.push_str(&format!(
            "<div class=\"bar-row\"><span class=\"label\">{}</span>\
             <div class=\"bar\"><div class=\"fill {}\" style=\"width: {pct}%\"></div></div>\
             <span class=\"value\">{pct}% ({})</span></div>\n",
            text(section, "name"),
            text(section, "status"),
            text(section, "progress_label"),
        ));
    }
    html.push_str("</div>\n");
    html
}

/// SVG path through `points` in a 100x100 box, smoothed with quadratic
/// segments that bend at each point and pass through the midpoints.
pub fn road_path(points: &[(f64, f64)]) -> String {
    let Some((first, rest)) = points.split_first() else {
        return String::new();
    };
    let mut d = format!("M {:.2} {:.2}", first.0, first.1);
    if rest.is_empty() {
        return d;
    }
    let mut prev = *first;
    for (i, point) in rest.iter().enumerate() {
        if i + 1 == rest.len() {
            d.push_str(&format!(" Q {:.2} {:.2} {:.2} {:.2}", prev.0, prev.1, point.0, point.1));
        } else {
            let mid = ((prev.0 + point.0) / 2.0, (prev.1 + point.1) / 2.0);
            d.push_str(&format!(" Q {:.2} {:.2} {:.2} {:.2}", prev.0, prev.1, mid.0, mid.1));
        }
        prev = *point;
    }
    d
}

fn winding_road(pathway: &[Value]) -> String {
    let points: Vec<(f64, f64)> = pathway
        .iter()
        .map(|node| (number(node, "x"), number(node, "y")))
        .collect();

    let mut svg = String::from(
        "<svg class=\"road\" viewBox=\"0 0 100 100\" preserveAspectRatio=\"none\" xmlns=\"http://www.w3.org/2000/svg\">\n",
    );
    svg.push_str(&format!(
        "  <path d=\"{}\" fill=\"none\" stroke=\"#9ca3af\" stroke-width=\"3\" stroke-linecap=\"round\"/>\n",
        road_path(&points)
    ));
    for node in pathway {
        let color = match node["status"].as_str() {
            Some("completed") => "#22c55e",
            Some("current") => "#eab308",
            _ => "#d1d5db",
        };
        svg.push_str(&format!(
            "  <circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"2.5\" fill=\"{color}\"><title>{}. {}</title></circle>\n",
            number(node, "x"),
            number(node, "y"),
            number(node, "order"),
            text(node, "title"),
        ));
    }
    svg.push_str("</svg>\n");
    svg
}

fn leaderboard_table(rows: &[Value]) -> String {
    if rows.is_empty() {
        return "<p class=\"meta\">No leaderboard entries.</p>\n".to_string();
    }
    let mut html = String::from("<table class=\"leaderboard\">\n");
    html.push_str("<thead><tr><th>Rank</th><th>Learner</th><th>Score</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for row in rows {
        let class = if row["is_current_user"].as_bool().unwrap_or(false) {
            " class=\"me\""
        } else {
            ""
        };
        html.push_str(&format!(
            "<tr{class}><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            text(row, "rank_label"),
            text(row, "name"),
            text(row, "score_label"),
        ));
    }
    html.push_str("</tbody></table>\n");
    html
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --done: #22c55e; --partial: #eab308; --me: #dbeafe; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --me: #1e3a8a; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.pct { font-weight: normal; color: #6b7280; }
.course { border-top: 1px solid var(--border); }
.bar-row { display: flex; align-items: center; gap: 1rem; margin: 0.25rem 0; }
.bar-row .label { width: 12rem; }
.bar { flex: 1; height: 0.75rem; background: var(--border); border-radius: 4px; overflow: hidden; }
.fill { height: 100%; background: var(--partial); }
.fill.completed { background: var(--done); }
.road { width: 100%; height: 16rem; margin: 1rem 0; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
tr.me { background: var(--me); font-weight: bold; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tests::sample_dashboard;

    fn render_sample() -> String {
        let ctx = TemplateContext::from_dashboard(&sample_dashboard());
        HtmlRenderer::default().render(&ctx).unwrap()
    }

    #[test]
    fn html_contains_required_elements() {
        let html = render_sample();
        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("<h1>Ada</h1>"));
        assert!(html.contains("#1 of 3"));
        assert!(html.contains("<svg class=\"road\""));
        assert!(html.contains("<tr class=\"me\"><td>=1</td><td>Ada</td>"));
    }

    #[test]
    fn html_escapes_text() {
        let html = render_sample();
        assert!(html.contains("Rust &lt;Basics&gt;"));
        assert!(html.contains("Types &amp; Traits"));
        assert!(!html.contains("Rust <Basics>"));
    }

    #[test]
    fn raw_json_is_optional() {
        let ctx = TemplateContext::from_dashboard(&sample_dashboard());
        let html = HtmlRenderer {
            include_raw_json: false,
        }
        .render(&ctx)
        .unwrap();
        assert!(!html.contains("Template context"));
    }

    #[test]
    fn empty_context_still_renders() {
        let html = HtmlRenderer::default()
            .render(&TemplateContext::new())
            .unwrap();
        assert!(html.contains("No courses."));
    }

    #[test]
    fn road_path_shapes() {
        assert_eq!(road_path(&[]), "");
        assert_eq!(road_path(&[(10.0, 85.0)]), "M 10.00 85.00");
        assert_eq!(
            road_path(&[(10.0, 85.0), (50.0, 50.0), (90.0, 25.0)]),
            "M 10.00 85.00 Q 10.00 85.00 30.00 67.50 Q 50.00 50.00 90.00 25.00"
        );
    }
}
