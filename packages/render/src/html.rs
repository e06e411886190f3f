//! Static HTML page assembly.

/// Escapes text for safe embedding in HTML markup and attributes.
#[must_use]
pub fn esc(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Wraps a body fragment in a complete standalone page.
#[must_use]
pub fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n\
         <style>body{{font-family:sans-serif;margin:1rem;}}</style>\n\
         </head>\n<body>\n{body}</body>\n</html>\n",
        esc(title)
    )
}

/// Builds the index page linking every exported month.
///
/// `pages` pairs each file name with its display label, already in the
/// order the links should appear.
#[must_use]
pub fn index_page(pages: &[(String, String)]) -> String {
    let mut body = String::from("<h1>Monthly incidence maps</h1>\n<ul>\n");
    for (file_name, label) in pages {
        body.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            esc(file_name),
            esc(label)
        ));
    }
    body.push_str("</ul>\n");
    page("Monthly incidence maps", &body)
}
