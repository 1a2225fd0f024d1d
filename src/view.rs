//! Dashboard page
//!
//! The page is rendered once per `GET /` from a [`Layout`] and the figure for
//! the default axis selection. Everything after that happens in the browser:
//! table paging is client-side, dropdown changes fetch a fresh figure from
//! `/api/figure`, and the download button hits `/download` with its click
//! counter.

use crate::dataset::Dataset;
use crate::figure::Figure;
use crate::schema::{AxisSelection, OUTPUT_COLUMNS, PARAMETER_COLUMNS};
use std::io::{self, Write};

pub const PAGE_TITLE: &str = "PEDOT:PSS High-Throughput Experiment";
pub const TABLE_PAGE_SIZE: usize = 10;
pub const IMAGE_PATH: &str = "/assets/polybot_logo.svg";
pub const IMAGE_CAPTION: &str =
    "Schematic illustrating the consecutive steps in the autonomous experiment workflow";

/// Static description of the page
#[derive(Debug, Clone)]
pub struct Layout<'a> {
    pub title: &'static str,
    pub dataset: &'a Dataset,
    pub page_size: usize,
    pub x_options: &'static [&'static str],
    pub y_options: &'static [&'static str],
    pub selection: AxisSelection,
    pub image_src: &'static str,
    pub image_caption: &'static str,
}

impl<'a> Layout<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self {
            title: PAGE_TITLE,
            dataset,
            page_size: TABLE_PAGE_SIZE,
            x_options: &PARAMETER_COLUMNS,
            y_options: &OUTPUT_COLUMNS,
            selection: AxisSelection::default(),
            image_src: IMAGE_PATH,
            image_caption: IMAGE_CAPTION,
        }
    }

    /// Number of table pages; an empty table still has one
    pub fn page_count(&self) -> usize {
        self.dataset.len().div_ceil(self.page_size).max(1)
    }
}

/// Render the page to a string
pub fn render_page(layout: &Layout<'_>, figure: &Figure) -> io::Result<String> {
    let mut buf = Vec::new();
    write(&mut buf, layout, figure)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

pub fn write<W: Write>(writer: &mut W, layout: &Layout<'_>, figure: &Figure) -> io::Result<()> {
    let figure_json = serde_json::to_string(figure)?.replace("</", "<\\/");

    write!(writer, r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css">
    <script src="https://cdn.plot.ly/plotly-2.35.2.min.js"></script>
    <style>
        h1 {{ text-align: center; margin-bottom: 30px; }}
        .dataset {{ padding: 40px 60px; background-color: #ffffff; }}
        .table-wrap {{ overflow-x: auto; margin-left: 20px; }}
        #data-table {{ border-collapse: collapse; width: 100%; font-family: Arial, sans-serif; }}
        #data-table th {{
            background-color: #f8f9fa;
            font-weight: bold;
            text-align: center;
            border: 1px solid #dee2e6;
            padding: 10px;
        }}
        #data-table td {{
            padding: 10px;
            text-align: left;
            border: 1px solid #dee2e6;
            background-color: #ffffff;
            color: #333;
        }}
        .pager {{ display: flex; gap: 0.5rem; align-items: center; justify-content: flex-end; margin-top: 0.5rem; }}
        .download {{ margin: 20px 0; float: right; margin-right: 40px; background-color: #e9ecef; }}
        .lower {{ display: flex; margin-top: 20px; clear: both; }}
        .schematic {{ flex: 1; margin-right: 10px; }}
        .schematic p {{ margin: 10px 0 10px 40px; }}
        .schematic img {{ width: 60%; margin-top: 10px; margin-left: 80px; }}
        .controls {{ flex: 1; margin-left: 40px; }}
        .controls select {{ width: 300px; display: block; margin-bottom: 0.75rem; }}
        .footer {{ color: #6c757d; font-size: 0.8rem; text-align: center; margin: 2rem 0 1rem; }}
    </style>
</head>
<body>
    <h1>{title}</h1>

    <div class="dataset">
        <h3>Dataset</h3>
        <div class="table-wrap">
            <table id="data-table">
                <thead>
                    <tr>{header}</tr>
                </thead>
                <tbody>
{body}
                </tbody>
            </table>
        </div>
        <div class="pager">
            <button id="page-prev" class="btn btn-sm btn-outline-secondary">&lsaquo;</button>
            <span id="page-label">1 / {page_count}</span>
            <button id="page-next" class="btn btn-sm btn-outline-secondary">&rsaquo;</button>
        </div>
    </div>

    <div class="download">
        <button id="btn-download" class="btn btn-light">Download Dataset</button>
    </div>

    <div class="lower">
        <div class="schematic">
            <p>{caption}</p>
            <img src="{image_src}" alt="Autonomous experiment workflow">
        </div>

        <div class="controls">
            <label for="x-axis">Select Parameter for X-axis:</label>
            <select id="x-axis" class="form-select">
{x_options}
            </select>
            <label for="y-axis">Select Parameter for Y-axis:</label>
            <select id="y-axis" class="form-select">
{y_options}
            </select>
            <div id="correlation-plot"></div>
        </div>
    </div>

    <div class="footer">{rows} rows loaded {loaded_at}</div>

    <script>
    const PAGE_SIZE = {page_size};
    const initialFigure = {figure_json};

    // Table paging
    const rows = Array.from(document.querySelectorAll('#data-table tbody tr'));
    const pageCount = Math.max(1, Math.ceil(rows.length / PAGE_SIZE));
    let page = 0;

    function showPage(p) {{
        page = Math.min(Math.max(p, 0), pageCount - 1);
        rows.forEach((tr, i) => {{
            tr.style.display = Math.floor(i / PAGE_SIZE) === page ? '' : 'none';
        }});
        document.getElementById('page-label').textContent = `${{page + 1}} / ${{pageCount}}`;
    }}
    document.getElementById('page-prev').onclick = () => showPage(page - 1);
    document.getElementById('page-next').onclick = () => showPage(page + 1);

    // Download: the click counter starts at zero so page load never downloads
    let nClicks = 0;
    document.getElementById('btn-download').onclick = () => {{
        nClicks += 1;
        window.location.href = `/download?n_clicks=${{nClicks}}`;
    }};

    // Figure
    function drawFigure(fig) {{
        Plotly.react('correlation-plot', fig.data, fig.layout);
    }}

    async function updateGraph() {{
        const params = new URLSearchParams({{
            x: document.getElementById('x-axis').value,
            y: document.getElementById('y-axis').value,
        }});
        const resp = await fetch(`/api/figure?${{params}}`);
        const body = await resp.json();
        if (body.ok) {{
            drawFigure(body.data);
        }} else {{
            console.error(body.error);
        }}
    }}
    document.getElementById('x-axis').onchange = updateGraph;
    document.getElementById('y-axis').onchange = updateGraph;

    // Initialize
    showPage(0);
    drawFigure(initialFigure);
    </script>
</body>
</html>
"#,
        title = html_escape(layout.title),
        header = table_header(layout.dataset),
        body = table_body(layout.dataset),
        page_count = layout.page_count(),
        page_size = layout.page_size,
        caption = html_escape(layout.image_caption),
        image_src = layout.image_src,
        x_options = select_options(layout.x_options, &layout.selection.x),
        y_options = select_options(layout.y_options, &layout.selection.y),
        rows = layout.dataset.len(),
        loaded_at = layout.dataset.loaded_at().format("%Y-%m-%d %H:%M:%S"),
        figure_json = figure_json,
    )?;

    Ok(())
}

fn table_header(dataset: &Dataset) -> String {
    dataset
        .columns()
        .iter()
        .map(|c| format!("<th>{}</th>", html_escape(c)))
        .collect()
}

fn table_body(dataset: &Dataset) -> String {
    dataset
        .rows()
        .iter()
        .map(|row| {
            let cells: String = row
                .iter()
                .map(|cell| format!("<td>{}</td>", html_escape(&cell.text)))
                .collect();
            format!("                    <tr>{}</tr>", cells)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn select_options(options: &[&str], selected: &str) -> String {
    options
        .iter()
        .map(|opt| {
            let attr = if *opt == selected { " selected" } else { "" };
            let escaped = html_escape(opt);
            format!("                <option value=\"{}\"{}>{}</option>", escaped, attr, escaped)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
