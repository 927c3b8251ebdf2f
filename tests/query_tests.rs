mod common;

use common::{CITY_GALLERY, TestResult, parse_city_gallery};
use htmlpath::{CacheConfig, Document, Node, QueryCache, Queryer};
use std::io::Write;

#[test]
fn test_query_all_returns_document_order() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = parse_city_gallery();
    let root = Node::from_document(&doc);

    let links = root.query_all("//li/a")?;
    let texts: Vec<String> = links.iter().map(|n| n.inner_text()).collect();
    assert_eq!(texts, vec!["London", "Paris", "Tokyo"]);

    let hrefs = root.query_all("//li/a/@href")?;
    let values: Vec<String> = hrefs.iter().map(|n| n.inner_text()).collect();
    assert_eq!(values, vec!["/London", "/Paris", "/Tokyo"]);
    Ok(())
}

#[test]
fn test_query_returns_the_first_match_or_none() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = parse_city_gallery();
    let root = Node::from_document(&doc);

    let title = root.query("//title")?.expect("title should match");
    assert_eq!(title.inner_text(), "City Gallery");

    assert!(root.query("//video")?.is_none());
    assert!(root.find_one("//video").is_none());
    Ok(())
}

#[test]
fn test_attribute_result_reads_as_text_and_as_attribute() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = parse_city_gallery();
    let root = Node::from_document(&doc);

    let href = root.find_one("//a[1]/@href").expect("href should match");
    assert_eq!(href.inner_text(), "/London");
    assert_eq!(href.data(), "href");
    assert_eq!(href.attribute_value("href")?, "/London");
    assert!(href.parent().is_none());
    Ok(())
}

#[test]
fn test_climbing_out_of_an_attribute_yields_one_element() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = Document::parse_str(r#"<html><b attr="1"></b></html>"#);
    let matches = Node::from_document(&doc).query_all("//b/@attr/..")?;

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].tag_name()?, "b");
    Ok(())
}

#[test]
fn test_identical_attribute_results_collapse_into_the_first() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = Document::parse_str(
        r#"<ul>
            <li><a href="/London">one</a></li>
            <li><a href="/London">two</a></li>
            <li><a href="/London">three</a></li>
        </ul>"#,
    );
    let hrefs = Node::from_document(&doc).query_all("//a/@href")?;

    assert_eq!(hrefs.len(), 1);
    assert_eq!(hrefs[0].inner_text(), "/London");
    Ok(())
}

#[test]
fn test_duplicates_of_later_results_survive() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    // The guard only compares candidates against the first accumulated
    // result, so a repeat of the second value passes through.
    let doc = Document::parse_str(
        r#"<ul>
            <li><a href="/London">one</a></li>
            <li><a href="/Paris">two</a></li>
            <li><a href="/Paris">three</a></li>
        </ul>"#,
    );
    let hrefs = Node::from_document(&doc).query_all("//a/@href")?;

    let values: Vec<String> = hrefs.iter().map(|n| n.inner_text()).collect();
    assert_eq!(values, vec!["/London", "/Paris", "/Paris"]);
    Ok(())
}

#[test]
fn test_queries_scope_to_the_starting_node() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = parse_city_gallery();
    let root = Node::from_document(&doc);

    assert_eq!(root.query_all("//h1")?.len(), 2);

    let article = root.find_one("//article").expect("article should match");
    let headings = article.query_all("//h1")?;
    assert_eq!(headings.len(), 1);
    assert_eq!(headings[0].inner_text(), "London");
    Ok(())
}

#[test]
fn test_ancestors_climb_past_the_starting_node() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = parse_city_gallery();
    let root = Node::from_document(&doc);
    let article = root.find_one("//article").expect("article should match");

    let tags: Vec<String> = article
        .query_all("ancestor::*")?
        .iter()
        .map(|n| n.tag_name().map(str::to_string))
        .collect::<Result<_, _>>()?;
    assert_eq!(tags, vec!["body", "html"]);
    Ok(())
}

#[test]
fn test_non_ascii_text_is_matched_and_extracted() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = Document::parse_str("<div><p>你好世界</p><p>Hello</p></div>");
    let root = Node::from_document(&doc);

    let p = root
        .find_one("//p[text()='你好世界']")
        .expect("non-ascii predicate should match");
    assert_eq!(p.inner_text(), "你好世界");

    let text = root.find_one("//p/text()").expect("text node should match");
    assert_eq!(text.inner_text(), "你好世界");
    Ok(())
}

#[test]
fn test_entities_are_decoded_before_matching() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = parse_city_gallery();
    let footer = Node::from_document(&doc)
        .find_one("//footer")
        .expect("footer should match");
    assert_eq!(footer.inner_text(), "Copyright \u{a9} Example Press");
    Ok(())
}

#[test]
fn test_output_html_round_trips_comments() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = parse_city_gallery();
    let header = Node::from_document(&doc)
        .find_one("//header")
        .expect("header should match");

    assert!(!header.inner_text().contains("Logo"));
    assert!(header.output_html(true).contains("<!-- Logo -->"));
    assert!(header.output_html(true).starts_with("<header>"));
    assert!(!header.output_html(false).contains("<header>"));
    assert_eq!(header.to_string(), header.output_html(true));
    Ok(())
}

#[test]
fn test_load_file_round_trip() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(CITY_GALLERY.as_bytes())?;

    let doc = Document::load_file(file.path())?;
    let title = Node::from_document(&doc)
        .find_one("//title")
        .expect("title should match");
    assert_eq!(title.inner_text(), "City Gallery");
    Ok(())
}

#[test]
fn test_bulk_eviction_through_the_executor() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let queryer = Queryer::with_cache(QueryCache::with_config(CacheConfig {
        max_entries: 2,
        enabled: true,
    }));
    let doc = parse_city_gallery();
    let root = Node::from_document(&doc);

    queryer.query_all(&root, "//a")?;
    queryer.query_all(&root, "//li")?;
    assert_eq!(queryer.cache().len(), 2);

    queryer.query_all(&root, "//h1")?;
    assert_eq!(queryer.cache().len(), 1);
    assert!(queryer.cache().contains("//h1"));
    assert!(!queryer.cache().contains("//a"));
    assert!(!queryer.cache().contains("//li"));
    Ok(())
}

#[test]
fn test_cached_expressions_answer_identically() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let queryer = Queryer::new();
    let doc = parse_city_gallery();
    let root = Node::from_document(&doc);

    let first = queryer.query_all(&root, "//li/a")?;
    let second = queryer.query_all(&root, "//li/a")?;
    assert_eq!(first, second);
    assert_eq!(queryer.cache().len(), 1);
    Ok(())
}

#[test]
fn test_disabled_cache_still_answers_queries() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let queryer = Queryer::with_cache(QueryCache::with_config(CacheConfig {
        max_entries: 50,
        enabled: false,
    }));
    let doc = parse_city_gallery();
    let root = Node::from_document(&doc);

    assert_eq!(queryer.query_all(&root, "//li/a")?.len(), 3);
    assert_eq!(queryer.cache().len(), 0);
    Ok(())
}
