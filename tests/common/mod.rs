use htmlpath::Document;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// A small gallery page exercising every node kind the tree can hold:
/// a doctype, elements with attributes, a comment, inter-element
/// whitespace, links, and an entity reference.
pub const CITY_GALLERY: &str = r#"<!DOCTYPE html>
<html lang="en-US">
<head>
    <title>City Gallery</title>
</head>
<body>
<header>
    <!-- Logo -->
    <h1>City Gallery</h1>
</header>
<nav>
    <ul>
        <li><a href="/London">London</a></li>
        <li><a href="/Paris">Paris</a></li>
        <li><a href="/Tokyo">Tokyo</a></li>
    </ul>
</nav>
<article>
    <h1>London</h1>
    <p>London is the capital city of England.</p>
</article>
<footer>Copyright &copy; Example Press</footer>
</body>
</html>
"#;

pub fn parse_city_gallery() -> Document {
    Document::parse_str(CITY_GALLERY)
}
