use quick_xml::events::Event;
use quick_xml::reader::Reader;
use rss::Channel;
use tracing::debug;

use crate::domain::models::RawItem;
use crate::error::ParseError;

/// Parse an RSS document into one `RawItem` per channel `<item>`.
///
/// A missing `<title>` or `<enclosure>` yields an empty string for that
/// field. A document that cannot be read as RSS, or that carries content
/// after its root element, is an error.
pub fn parse_feed(body: &[u8]) -> Result<Vec<RawItem>, ParseError> {
    ensure_single_root(body)?;
    let channel = Channel::read_from(body)?;

    let items: Vec<RawItem> = channel
        .items()
        .iter()
        .map(|item| RawItem {
            title: item.title().unwrap_or("").to_string(),
            enclosure_url: item
                .enclosure()
                .map(|enc| enc.url().to_string())
                .unwrap_or_default(),
        })
        .collect();

    debug!("Parsed feed '{}' with {} items", channel.title(), items.len());
    Ok(items)
}

/// The RSS reader stops at the closing root tag, so anything after it is
/// checked here. Only whitespace, comments and processing instructions may
/// follow the root element.
fn ensure_single_root(body: &[u8]) -> Result<(), ParseError> {
    let mut reader = Reader::from_reader(body);
    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut root_closed = false;

    loop {
        let event = reader.read_event_into(&mut buf)?;
        if root_closed {
            match event {
                Event::Eof => break,
                Event::Comment(_) | Event::PI(_) => {}
                Event::Text(text) if text.iter().all(u8::is_ascii_whitespace) => {}
                _ => {
                    return Err(ParseError::TrailingContent {
                        position: reader.buffer_position(),
                    })
                }
            }
        } else {
            match event {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    depth = depth.saturating_sub(1);
                    root_closed = depth == 0;
                }
                Event::Empty(_) if depth == 0 => root_closed = true,
                Event::Eof => break,
                _ => {}
            }
        }
        buf.clear();
    }

    Ok(())
}
