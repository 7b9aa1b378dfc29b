/// Result of fetching and parsing one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedPage {
    pub title: String,
    pub links: Vec<ScrapedLink>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedLink {
    pub link: String,
    pub name: String,
}
