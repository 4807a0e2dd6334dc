/// One `<item>` from the feed channel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawItem {
    pub title: String,
    /// Empty when the item carries no enclosure.
    pub enclosure_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeRecord {
    pub name: String,
    pub link: String,
    pub episode_number: u32,
}
