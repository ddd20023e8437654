use crate::{run_log::LogEntry, util};
use std::fmt::Write;

/// The run log as the two sinks show it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLog {
    pub console: String,
    pub page: PageModel,
}

/// Lines shown on the results page, in log order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageModel {
    pub lines: Vec<String>,
}

pub fn render(entries: &[LogEntry]) -> RenderedLog {
    let lines = lines(entries);

    RenderedLog {
        console: lines.join("\n"),
        page: PageModel { lines },
    }
}

/// Each entry's headings followed by its line.
pub fn lines(entries: &[LogEntry]) -> Vec<String> {
    entries
        .iter()
        .flat_map(|entry| {
            entry
                .headings
                .iter()
                .map(|heading| String::from(*heading))
                .chain(std::iter::once(entry.line.clone()))
        })
        .collect()
}

impl PageModel {
    pub fn to_html(&self) -> String {
        let mut html = String::from(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
             <title>Hello Galaxy: REST</title>\n</head>\n<body>\n\
             <h1>Database test results</h1>\n<pre>\n",
        );

        for line in &self.lines {
            // writing into a String cannot fail
            let _ = writeln!(html, "{}", util::escape_html(line));
        }

        html.push_str("</pre>\n<p><a href=\"/\">Back</a></p>\n</body>\n</html>\n");
        html
    }
}

pub fn landing_page() -> &'static str {
    "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
     <title>Hello Galaxy: REST</title>\n</head>\n<body>\n\
     <h1>Hello Galaxy: REST</h1>\n\
     <p>Walks collections, tables, SQL passthrough, joins, transactions and the catalog \
     through the database's REST interface.</p>\n\
     <p><a href=\"/databasetest\">Run the database test</a></p>\n\
     </body>\n</html>\n"
}
