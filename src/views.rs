//! Built-in HTML views for the demo admin.
//!
//! Implements the view engine seam with the three shared `crud/*`
//! templates rendered straight from the action context. A real
//! deployment would swap this for a template engine behind the same
//! trait.

use serde_json::Value;

use adminkit_core::error::AppError;
use adminkit_core::result::AppResult;
use adminkit_crud::view::{ViewContext, ViewEngine};

/// View engine rendering the shared CRUD templates.
#[derive(Debug, Default)]
pub struct AdminViews;

impl AdminViews {
    /// Create the view engine.
    pub fn new() -> Self {
        Self
    }
}

const TEMPLATES: &[&str] = &["crud/index.html", "crud/add.html", "crud/edit.html"];

impl ViewEngine for AdminViews {
    fn exists(&self, template: &str) -> bool {
        TEMPLATES.contains(&template)
    }

    fn render(&self, template: &str, context: &ViewContext) -> AppResult<String> {
        match template {
            "crud/index.html" => Ok(render_index(context)),
            "crud/add.html" => Ok(render_form_page(context, "Add")),
            "crud/edit.html" => Ok(render_form_page(context, "Edit")),
            _ => Err(AppError::template(format!(
                "Template '{template}' not found"
            ))),
        }
    }
}

fn render_index(context: &ViewContext) -> String {
    let config = &context["config"];
    let grid = &context["grid"];
    let pager = &context["pager"];
    let prefix = string_at(config, "route_prefix");
    let entity = string_at(config, "entity_name");
    let sort_by = context.get("sort_by").map(as_display).unwrap_or_default();
    let sort_order = context
        .get("sort_order")
        .map(as_display)
        .unwrap_or_default();

    let mut html = String::new();
    html.push_str("<!DOCTYPE html><html><body>");
    html.push_str(&format!("<h1>{}</h1>", html_escape(&entity)));

    for flash in context
        .get("flashes")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
    {
        html.push_str(&format!(
            "<p class=\"flash flash-{}\">{}</p>",
            html_escape(&string_at(flash, "level")),
            html_escape(&string_at(flash, "key")),
        ));
    }

    html.push_str(&format!(
        "<p><a href=\"{}add\">Add {}</a></p>",
        html_escape(&with_trailing_slash(&prefix)),
        html_escape(&entity),
    ));

    html.push_str("<table><thead><tr>");
    let columns: Vec<&Value> = grid["columns"].as_array().map(|c| c.iter().collect()).unwrap_or_default();
    for column in &columns {
        let field = string_at(column, "field");
        let label = html_escape(&string_at(column, "label"));
        if column["sortable"] == Value::Bool(true) {
            // Clicking the active column flips the direction.
            let next = if sort_by == field && sort_order == "asc" {
                "desc"
            } else {
                "asc"
            };
            let marker = if sort_by == field { " *" } else { "" };
            html.push_str(&format!(
                "<th><a href=\"?sort_by={}&sort_order={}\">{}</a>{}</th>",
                html_escape(&field),
                next,
                label,
                marker,
            ));
        } else {
            html.push_str(&format!("<th>{label}</th>"));
        }
    }
    html.push_str("<th></th></tr></thead><tbody>");

    for item in pager["items"].as_array().into_iter().flatten() {
        html.push_str("<tr>");
        for column in &columns {
            let field = string_at(column, "field");
            html.push_str(&format!(
                "<td>{}</td>",
                html_escape(&as_display(&item[field.as_str()]))
            ));
        }
        let id = string_at(item, "id");
        html.push_str(&format!(
            "<td><a href=\"{prefix}/edit/{id}\">edit</a> \
             <form method=\"post\" action=\"{prefix}/delete/{id}\"><button>delete</button></form></td>",
            prefix = html_escape(prefix.trim_end_matches('/')),
            id = html_escape(&id),
        ));
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");

    html.push_str(&format!(
        "<p>Page {} of {} ({} total)</p>",
        as_display(&pager["page"]),
        as_display(&pager["total_pages"]),
        as_display(&pager["total_items"]),
    ));
    html.push_str("</body></html>");
    html
}

fn render_form_page(context: &ViewContext, heading: &str) -> String {
    let config = &context["config"];
    let form = &context["form"];
    let entity = string_at(config, "entity_name");

    let mut html = String::new();
    html.push_str("<!DOCTYPE html><html><body>");
    html.push_str(&format!(
        "<h1>{} {}</h1>",
        html_escape(heading),
        html_escape(&entity)
    ));

    for error in form["errors"].as_array().into_iter().flatten() {
        html.push_str(&format!(
            "<p class=\"error\">{}: {}</p>",
            html_escape(&string_at(error, "field")),
            html_escape(&string_at(error, "message")),
        ));
    }

    html.push_str("<form method=\"post\">");
    if let Some(values) = form["values"].as_object() {
        for (field, value) in values {
            html.push_str(&format!(
                "<label>{field}<input name=\"{field}\" value=\"{value}\"></label>",
                field = html_escape(field),
                value = html_escape(&as_display(value)),
            ));
        }
    }
    html.push_str("<button type=\"submit\">Save</button></form>");
    html.push_str(&format!(
        "<p><a href=\"{}\">Back to list</a></p>",
        html_escape(&string_at(config, "route_prefix")),
    ));
    html.push_str("</body></html>");
    html
}

fn string_at(value: &Value, key: &str) -> String {
    value
        .get(key)
        .map(as_display)
        .unwrap_or_default()
}

/// Display a JSON scalar without quoting strings.
fn as_display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn with_trailing_slash(prefix: &str) -> String {
    if prefix.ends_with('/') {
        prefix.to_string()
    } else {
        format!("{prefix}/")
    }
}

fn html_escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
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
