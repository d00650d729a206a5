//! HTML extractor for publication index entries
//!
//! The source page lists papers either as table rows or as classed list
//! blocks (`.paper-item` / `.article-item`). Both shapes are scanned per
//! snapshot. Extraction is tolerant at the entry level: a missing title or
//! an empty author list disqualifies only that entry, never the batch.

use crate::paper::Paper;
use chrono::{NaiveDate, Utc};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Result of extracting one fetched snapshot
#[derive(Debug, Clone)]
pub struct ExtractedBatch {
    /// Records extracted in page order
    pub papers: Vec<Paper>,

    /// Entries dropped for missing title or authors
    pub skipped: usize,
}

/// Extracts paper records from a fetched index page
///
/// Relative article links are resolved against `base_url`. The output is a
/// finite batch for this snapshot; duplicate entries within the page are
/// left for the deduplication stage.
pub fn extract_papers(html: &str, base_url: &Url) -> ExtractedBatch {
    let document = Html::parse_document(html);

    let mut papers = Vec::new();
    let mut skipped = 0usize;

    if let Ok(item_selector) = Selector::parse(".paper-item, .article-item") {
        for element in document.select(&item_selector) {
            match parse_item(&element, base_url) {
                Some(paper) => papers.push(paper),
                None => {
                    skipped += 1;
                    tracing::debug!("Skipping malformed index item");
                }
            }
        }
    }

    if let Ok(row_selector) = Selector::parse("table tr") {
        for element in document.select(&row_selector) {
            // Rows carrying the item classes were handled above
            if is_item_element(&element) {
                continue;
            }

            match parse_row(&element, base_url) {
                RowParse::Paper(paper) => papers.push(paper),
                RowParse::Malformed => {
                    skipped += 1;
                    tracing::debug!("Skipping malformed index row");
                }
                RowParse::NotAnEntry => {}
            }
        }
    }

    ExtractedBatch { papers, skipped }
}

enum RowParse {
    Paper(Paper),
    Malformed,
    /// Header or structural row with no data cells
    NotAnEntry,
}

/// Parses a classed list block (`.paper-item` / `.article-item`)
fn parse_item(element: &ElementRef, base_url: &Url) -> Option<Paper> {
    let title = classed_text(element, ".title, .paper-title")
        .or_else(|| first_link_text(element))?;

    let authors = classed_text(element, ".authors, .paper-authors")
        .map(|s| split_names(&s))
        .unwrap_or_default();
    if authors.is_empty() {
        return None;
    }

    Some(assemble(
        element,
        base_url,
        title,
        authors,
        classed_text(element, ".issue"),
        classed_text(element, ".pages"),
        classed_text(element, ".date, .publication-date"),
    ))
}

/// Parses a table row; cells fall back positionally to
/// title / authors / issue / pages / date.
fn parse_row(element: &ElementRef, base_url: &Url) -> RowParse {
    let cells = cell_texts(element);
    if cells.is_empty() {
        return RowParse::NotAnEntry;
    }

    let title = match classed_text(element, ".title, .paper-title")
        .or_else(|| nonempty(cells.first()))
    {
        Some(t) => t,
        None => return RowParse::Malformed,
    };

    let authors = classed_text(element, ".authors, .paper-authors")
        .or_else(|| nonempty(cells.get(1)))
        .map(|s| split_names(&s))
        .unwrap_or_default();
    if authors.is_empty() {
        return RowParse::Malformed;
    }

    RowParse::Paper(assemble(
        element,
        base_url,
        title,
        authors,
        classed_text(element, ".issue").or_else(|| nonempty(cells.get(2))),
        classed_text(element, ".pages").or_else(|| nonempty(cells.get(3))),
        classed_text(element, ".date, .publication-date").or_else(|| nonempty(cells.get(4))),
    ))
}

fn assemble(
    element: &ElementRef,
    base_url: &Url,
    title: String,
    authors: Vec<String>,
    issue: Option<String>,
    pages: Option<String>,
    date_text: Option<String>,
) -> Paper {
    // Entries without a parseable date carry the crawl date
    let publication_date = date_text
        .as_deref()
        .and_then(parse_publication_date)
        .unwrap_or_else(|| Utc::now().date_naive());

    Paper {
        title,
        authors,
        issue: issue.unwrap_or_default(),
        pages: pages.unwrap_or_default(),
        publication_date,
        keywords: classed_text(element, ".keywords")
            .map(|s| split_names(&s))
            .unwrap_or_default(),
        abstract_text: classed_text(element, ".abstract"),
        source_url: first_link(element, base_url),
    }
}

/// Returns true for elements carrying the list-item classes
fn is_item_element(element: &ElementRef) -> bool {
    element
        .value()
        .classes()
        .any(|c| c == "paper-item" || c == "article-item")
}

/// Text of the first descendant matching the selector list, whitespace
/// collapsed; None when absent or empty
fn classed_text(element: &ElementRef, selectors: &str) -> Option<String> {
    let selector = Selector::parse(selectors).ok()?;
    element
        .select(&selector)
        .next()
        .map(|el| collect_text(&el))
        .filter(|s| !s.is_empty())
}

/// All `<td>` texts of a row, in order, empties included so positions hold
fn cell_texts(element: &ElementRef) -> Vec<String> {
    match Selector::parse("td") {
        Ok(selector) => element
            .select(&selector)
            .map(|el| collect_text(&el))
            .collect(),
        Err(_) => Vec::new(),
    }
}

fn collect_text(element: &ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn nonempty(cell: Option<&String>) -> Option<String> {
    cell.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Splits an author or keyword listing on the separators the source mixes
/// freely: ASCII and fullwidth commas, enumeration comma, semicolons.
fn split_names(s: &str) -> Vec<String> {
    s.split([',', '，', '、', ';', '；'])
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

fn parse_publication_date(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    for format in ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    None
}

fn first_link_text(element: &ElementRef) -> Option<String> {
    let selector = Selector::parse("a[href]").ok()?;
    element
        .select(&selector)
        .next()
        .map(|el| collect_text(&el))
        .filter(|s| !s.is_empty())
}

/// First link of the entry, resolved to an absolute http(s) URL
fn first_link(element: &ElementRef, base_url: &Url) -> Option<String> {
    let selector = Selector::parse("a[href]").ok()?;
    element
        .select(&selector)
        .filter_map(|el| el.value().attr("href"))
        .find_map(|href| resolve_link(href, base_url))
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None for javascript:/mailto:/tel:/data: schemes, fragment-only
/// anchors, and anything that does not resolve to http(s).
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            Some(absolute.to_string())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://journal.example.edu/oa/Dlistnum.aspx").unwrap()
    }

    #[test]
    fn test_table_rows_extracted_positionally() {
        let html = r#"
            <html><body><table>
                <tr>
                    <td><a href="darticle.aspx?type=view&id=123">高等教育治理现代化研究</a></td>
                    <td>张三，李四</td>
                    <td>2024年第2期</td>
                    <td>1-8</td>
                    <td>2024-03-15</td>
                </tr>
            </table></body></html>
        "#;
        let batch = extract_papers(html, &base_url());

        assert_eq!(batch.papers.len(), 1);
        assert_eq!(batch.skipped, 0);

        let paper = &batch.papers[0];
        assert_eq!(paper.title, "高等教育治理现代化研究");
        assert_eq!(paper.authors, vec!["张三", "李四"]);
        assert_eq!(paper.issue, "2024年第2期");
        assert_eq!(paper.pages, "1-8");
        assert_eq!(
            paper.publication_date,
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
        assert_eq!(
            paper.source_url.as_deref(),
            Some("https://journal.example.edu/oa/darticle.aspx?type=view&id=123")
        );
    }

    #[test]
    fn test_malformed_rows_skipped_individually() {
        // 5 data rows, 2 malformed: one missing a title, one missing authors
        let html = r#"
            <html><body><table>
                <tr><td>论文一</td><td>张三</td></tr>
                <tr><td></td><td>佚名</td></tr>
                <tr><td>论文二</td><td>李四、王五</td></tr>
                <tr><td>论文三</td><td></td></tr>
                <tr><td>论文四</td><td>赵六</td></tr>
            </table></body></html>
        "#;
        let batch = extract_papers(html, &base_url());

        assert_eq!(batch.papers.len(), 3);
        assert_eq!(batch.skipped, 2);

        let titles: Vec<&str> = batch.papers.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["论文一", "论文二", "论文四"]);
    }

    #[test]
    fn test_header_row_is_not_an_entry() {
        let html = r#"
            <html><body><table>
                <tr><th>标题</th><th>作者</th></tr>
                <tr><td>论文一</td><td>张三</td></tr>
            </table></body></html>
        "#;
        let batch = extract_papers(html, &base_url());

        assert_eq!(batch.papers.len(), 1);
        // The header row has no <td> cells and is ignored, not counted
        assert_eq!(batch.skipped, 0);
    }

    #[test]
    fn test_classed_item_blocks() {
        let html = r#"
            <html><body>
                <div class="paper-item">
                    <span class="title">新时代大学生思想政治教育创新路径探析</span>
                    <span class="authors">王五，赵六</span>
                    <span class="issue">2024年第2期</span>
                    <span class="pages">9-16</span>
                    <span class="date">2024/03/20</span>
                    <span class="keywords">思想政治教育、创新路径</span>
                    <p class="abstract">探讨创新发展路径</p>
                    <a href="/oa/darticle.aspx?id=124">全文</a>
                </div>
            </body></html>
        "#;
        let batch = extract_papers(html, &base_url());

        assert_eq!(batch.papers.len(), 1);
        let paper = &batch.papers[0];
        assert_eq!(paper.authors, vec!["王五", "赵六"]);
        assert_eq!(paper.keywords, vec!["思想政治教育", "创新路径"]);
        assert_eq!(paper.abstract_text.as_deref(), Some("探讨创新发展路径"));
        assert_eq!(
            paper.publication_date,
            NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
        );
        assert_eq!(
            paper.source_url.as_deref(),
            Some("https://journal.example.edu/oa/darticle.aspx?id=124")
        );
    }

    #[test]
    fn test_item_without_authors_skipped() {
        let html = r#"
            <html><body>
                <div class="article-item"><span class="title">只有标题</span></div>
            </body></html>
        "#;
        let batch = extract_papers(html, &base_url());

        assert!(batch.papers.is_empty());
        assert_eq!(batch.skipped, 1);
    }

    #[test]
    fn test_author_separators() {
        assert_eq!(split_names("张三，李四、王五,赵六;钱七"),
                   vec!["张三", "李四", "王五", "赵六", "钱七"]);
        assert_eq!(split_names("  单作者  "), vec!["单作者"]);
        assert!(split_names("，、 ,").is_empty());
    }

    #[test]
    fn test_date_formats_and_fallback() {
        assert_eq!(
            parse_publication_date("2024-03-15"),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(
            parse_publication_date(" 2024/03/15 "),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(
            parse_publication_date("2024.03.15"),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(parse_publication_date("第2期"), None);

        // An unparseable date does not disqualify the row
        let html = r#"
            <html><body><table>
                <tr><td>论文一</td><td>张三</td><td>2024年第2期</td><td>1-8</td><td>近期</td></tr>
            </table></body></html>
        "#;
        let batch = extract_papers(html, &base_url());
        assert_eq!(batch.papers.len(), 1);
        assert_eq!(batch.papers[0].publication_date, Utc::now().date_naive());
    }

    #[test]
    fn test_link_resolution_rules() {
        let base = base_url();

        assert_eq!(
            resolve_link("darticle.aspx?id=5", &base).as_deref(),
            Some("https://journal.example.edu/oa/darticle.aspx?id=5")
        );
        assert_eq!(resolve_link("javascript:void(0)", &base), None);
        assert_eq!(resolve_link("mailto:editor@example.edu", &base), None);
        assert_eq!(resolve_link("#top", &base), None);
        assert_eq!(resolve_link("", &base), None);
    }

    #[test]
    fn test_empty_document_yields_empty_batch() {
        let batch = extract_papers("<html><body><p>暂无数据</p></body></html>", &base_url());
        assert!(batch.papers.is_empty());
        assert_eq!(batch.skipped, 0);
    }
}
