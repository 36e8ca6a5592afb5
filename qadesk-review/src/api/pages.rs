//! Server-rendered HTML pages
//!
//! Every value that reaches the page goes through [`escape_html`].

use qadesk_common::db::{ArchiveRecord, Queue, QueueRecord};

use super::session::Operator;

/// Escape text for HTML element content and quoted attribute values
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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

fn layout(title: &str, operator: Option<&Operator>, body: &str) -> String {
    let nav = match operator {
        Some(op) => format!(
            r#"<nav>
        <span class="who">{name}</span>
        <a href="/?source=qa">QA queue</a>
        <a href="/?source=problem">Problem queue</a>
        <a href="/records">Records</a>
        <a href="/logout">Log out</a>
    </nav>"#,
            name = escape_html(&op.name)
        ),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - qadesk</title>
    <style>
        body {{
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            background-color: #1a1a1a;
            color: #e0e0e0;
            line-height: 1.6;
            margin: 0;
        }}
        header {{
            background-color: #2a2a2a;
            border-bottom: 1px solid #3a3a3a;
            padding: 12px 20px;
            display: flex;
            justify-content: space-between;
            align-items: center;
        }}
        h1 {{ font-size: 22px; color: #4a9eff; margin: 0; }}
        nav a {{ color: #4a9eff; margin-left: 14px; }}
        .who {{ color: #888; }}
        main {{ padding: 20px; }}
        label {{ display: block; margin-top: 10px; color: #aaa; }}
        input[type=text], textarea {{
            width: 100%;
            max-width: 640px;
            background: #2a2a2a;
            color: #e0e0e0;
            border: 1px solid #3a3a3a;
            padding: 6px;
        }}
        textarea {{ min-height: 120px; }}
        button {{ margin-top: 12px; margin-right: 8px; padding: 6px 16px; }}
        table {{ border-collapse: collapse; width: 100%; }}
        th, td {{ border-bottom: 1px solid #3a3a3a; padding: 6px; text-align: left; }}
        .field {{ color: #888; }}
        .empty {{ color: #888; font-style: italic; }}
        img {{ max-width: 320px; }}
    </style>
</head>
<body>
    <header>
        <h1>{title}</h1>
        {nav}
    </header>
    <main>
{body}
    </main>
</body>
</html>
"#,
        title = escape_html(title),
    )
}

/// Login form, optionally with an error message
pub fn login_page(message: Option<&str>) -> String {
    let notice = message
        .map(|m| format!(r#"<p class="empty">{}</p>"#, escape_html(m)))
        .unwrap_or_default();
    let body = format!(
        r#"{notice}
        <form method="post" action="/login">
            <label for="admin">Operator name</label>
            <input type="text" id="admin" name="admin" autofocus>
            <button type="submit">Log in</button>
        </form>"#
    );
    layout("Log in", None, &body)
}

/// Review page: the claimed record with submit and skip forms
pub fn review_page(
    operator: &Operator,
    queue: Queue,
    record: Option<&QueueRecord>,
    skipped_count: i64,
) -> String {
    let title = match queue {
        Queue::Qa => "QA queue",
        Queue::Problem => "Problem queue",
    };
    let summary = format!(
        r#"<p class="field">Skipped in this queue: <strong id="skipped-count">{skipped_count}</strong></p>"#
    );

    let Some(record) = record else {
        let body = format!(
            r#"{summary}
        <p class="empty">No records waiting in this queue.</p>"#
        );
        return layout(title, Some(operator), &body);
    };

    let text = |v: &Option<String>| escape_html(v.as_deref().unwrap_or(""));
    let image = record
        .image_url
        .as_deref()
        .filter(|u| !u.is_empty())
        .map(|u| format!(r#"<img src="{0}" alt="product image">"#, escape_html(u)))
        .unwrap_or_default();
    let jump = record
        .jump_url
        .as_deref()
        .filter(|u| !u.is_empty())
        .map(|u| format!(r#"<a href="{0}" target="_blank" rel="noopener">source page</a>"#, escape_html(u)))
        .unwrap_or_default();

    let body = format!(
        r#"{summary}
        <table>
            <tr><td class="field">Record</td><td>{id}</td></tr>
            <tr><td class="field">Label</td><td>{label}</td></tr>
            <tr><td class="field">Number</td><td>{number}</td></tr>
            <tr><td class="field">Batch code</td><td>{batch}</td></tr>
            <tr><td class="field">Contributor</td><td>{contributor} {contributed_at}</td></tr>
            <tr><td class="field">Images</td><td>{image_count}</td></tr>
            <tr><td class="field">Note</td><td>{note}</td></tr>
        </table>
        {image}
        {jump}
        <form method="post" action="/submit">
            <input type="hidden" name="doc_id" value="{id}">
            <input type="hidden" name="source" value="{source}">
            <label for="title">Title</label>
            <input type="text" id="title" name="title">
            <label for="description">Description</label>
            <textarea id="description" name="description"></textarea>
            <button type="submit">Submit</button>
        </form>
        <form method="post" action="/skip">
            <input type="hidden" name="doc_id" value="{id}">
            <input type="hidden" name="source" value="{source}">
            <button type="submit">Skip</button>
        </form>"#,
        id = escape_html(&record.id),
        label = text(&record.label),
        number = text(&record.number),
        batch = text(&record.batch_code),
        contributor = text(&record.contributor),
        contributed_at = text(&record.contributed_at),
        image_count = record.image_count.unwrap_or(0),
        note = text(&record.description),
        source = queue.as_str(),
    );

    layout(title, Some(operator), &body)
}

/// Archive listing with search box
pub fn records_page(operator: &Operator, query: &str, records: &[ArchiveRecord]) -> String {
    let rows: String = records
        .iter()
        .map(|r| {
            format!(
                r#"
            <tr>
                <td>{number}</td>
                <td>{title}</td>
                <td>{reviewer}</td>
                <td>{reviewed_at}</td>
                <td><a href="/edit/{id}">edit</a></td>
            </tr>"#,
                number = escape_html(&r.number),
                title = escape_html(&r.title),
                reviewer = escape_html(&r.reviewer),
                reviewed_at = escape_html(&r.reviewed_at),
                id = escape_html(&r.id),
            )
        })
        .collect();

    let listing = if records.is_empty() {
        r#"<p class="empty">No records found.</p>"#.to_string()
    } else {
        format!(
            r#"<table>
            <tr><th>Number</th><th>Title</th><th>Reviewer</th><th>Reviewed</th><th></th></tr>{rows}
        </table>"#
        )
    };

    let body = format!(
        r#"<form method="get" action="/records">
            <input type="text" name="q" value="{q}" placeholder="Search title or number">
            <button type="submit">Search</button>
        </form>
        <p class="field">{count} record(s)</p>
        {listing}"#,
        q = escape_html(query),
        count = records.len(),
    );

    layout("Records", Some(operator), &body)
}

/// Edit form for one archive record
pub fn edit_page(operator: &Operator, record: &ArchiveRecord) -> String {
    let body = format!(
        r#"<table>
            <tr><td class="field">Record</td><td>{id}</td></tr>
            <tr><td class="field">Number</td><td>{number}</td></tr>
            <tr><td class="field">Reviewer</td><td>{reviewer} {reviewed_at}</td></tr>
        </table>
        <form method="post" action="/edit/{id}">
            <label for="title">Title</label>
            <input type="text" id="title" name="title" value="{title}">
            <label for="description">Description</label>
            <textarea id="description" name="description">{description}</textarea>
            <button type="submit">Save</button>
        </form>"#,
        id = escape_html(&record.id),
        number = escape_html(&record.number),
        reviewer = escape_html(&record.reviewer),
        reviewed_at = escape_html(&record.reviewed_at),
        title = escape_html(&record.title),
        description = escape_html(&record.description),
    );

    layout("Edit record", Some(operator), &body)
}
