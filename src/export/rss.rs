use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;

/// A single RSS `<item>`.
#[derive(Debug, Clone)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub author: String,
    /// Raw entry content, carried through without sanitization or truncation.
    pub description: String,
    /// Decimal string form of the source entry's numeric id.
    pub guid: String,
}

/// An in-memory RSS channel, built fresh per export, serialized once and
/// discarded.
#[derive(Debug, Clone)]
pub struct FeedDocument {
    pub title: String,
    pub link: String,
    pub description: String,
    pub created: DateTime<Utc>,
    pub items: Vec<FeedItem>,
}

impl FeedDocument {
    /// Serializes the document as an RSS 2.0 XML string.
    ///
    /// Items appear in insertion order. Text content is XML-escaped by the
    /// writer; the `<guid>` carries `isPermaLink="false"` since identifiers
    /// are numeric ids, not URLs.
    pub fn to_rss(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .context("Failed to write XML declaration")?;

        // <rss version="2.0">
        let mut rss = BytesStart::new("rss");
        rss.push_attribute(("version", "2.0"));
        writer
            .write_event(Event::Start(rss))
            .context("Failed to write rss element")?;

        writer
            .write_event(Event::Start(BytesStart::new("channel")))
            .context("Failed to write channel element")?;

        write_text_element(&mut writer, "title", &self.title)?;
        write_text_element(&mut writer, "link", &self.link)?;
        write_text_element(&mut writer, "description", &self.description)?;

        let stamp = self.created.to_rfc2822();
        write_text_element(&mut writer, "pubDate", &stamp)?;
        write_text_element(&mut writer, "lastBuildDate", &stamp)?;

        for item in &self.items {
            writer
                .write_event(Event::Start(BytesStart::new("item")))
                .context("Failed to write item element")?;

            write_text_element(&mut writer, "title", &item.title)?;
            write_text_element(&mut writer, "link", &item.link)?;
            write_text_element(&mut writer, "author", &item.author)?;
            write_text_element(&mut writer, "description", &item.description)?;

            let mut guid = BytesStart::new("guid");
            guid.push_attribute(("isPermaLink", "false"));
            writer
                .write_event(Event::Start(guid))
                .context("Failed to write guid element")?;
            writer
                .write_event(Event::Text(BytesText::new(&item.guid)))
                .context("Failed to write guid text")?;
            writer
                .write_event(Event::End(BytesEnd::new("guid")))
                .context("Failed to write guid end")?;

            writer
                .write_event(Event::End(BytesEnd::new("item")))
                .context("Failed to write item end")?;
        }

        writer
            .write_event(Event::End(BytesEnd::new("channel")))
            .context("Failed to write channel end")?;
        writer
            .write_event(Event::End(BytesEnd::new("rss")))
            .context("Failed to write rss end")?;

        let result = writer.into_inner().into_inner();
        String::from_utf8(result).context("Generated RSS contains invalid UTF-8")
    }
}

fn write_text_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &str,
) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .with_context(|| format!("Failed to write {} element", name))?;
    writer
        .write_event(Event::Text(BytesText::new(value)))
        .with_context(|| format!("Failed to write {} text", name))?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .with_context(|| format!("Failed to write {} end", name))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_document(items: Vec<FeedItem>) -> FeedDocument {
        FeedDocument {
            title: "Miniflux starred entries".to_string(),
            link: "http://localhost:8080".to_string(),
            description: "RSS feed from all starred entries in Miniflux".to_string(),
            created: Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
            items,
        }
    }

    fn test_item(id: i64, title: &str) -> FeedItem {
        FeedItem {
            title: title.to_string(),
            link: format!("https://example.com/{}", id),
            author: "Alice".to_string(),
            description: "<p>body</p>".to_string(),
            guid: id.to_string(),
        }
    }

    #[test]
    fn test_channel_structure() {
        let rss = test_document(vec![test_item(1, "Only")]).to_rss().unwrap();

        assert!(rss.starts_with("<?xml"));
        assert!(rss.contains(r#"<rss version="2.0">"#));
        assert!(rss.contains("<channel>"));
        assert!(rss.contains("<title>Miniflux starred entries</title>"));
        assert!(rss.contains("<link>http://localhost:8080</link>"));
        assert!(rss.contains("<description>RSS feed from all starred entries in Miniflux</description>"));
        assert!(rss.contains("</channel>"));
        assert!(rss.contains("</rss>"));
    }

    #[test]
    fn test_dates_are_rfc2822() {
        let rss = test_document(Vec::new()).to_rss().unwrap();
        assert!(rss.contains("<pubDate>Mon, 15 Jan 2024 12:00:00 +0000</pubDate>"));
        assert!(rss.contains("<lastBuildDate>Mon, 15 Jan 2024 12:00:00 +0000</lastBuildDate>"));
    }

    #[test]
    fn test_items_in_insertion_order() {
        let rss = test_document(vec![test_item(1, "First"), test_item(3, "Third")])
            .to_rss()
            .unwrap();

        assert_eq!(rss.matches("<item>").count(), 2);
        let first = rss.find("<title>First</title>").unwrap();
        let third = rss.find("<title>Third</title>").unwrap();
        assert!(first < third);
    }

    #[test]
    fn test_guid_is_not_a_permalink() {
        let rss = test_document(vec![test_item(42, "Answer")]).to_rss().unwrap();
        assert!(rss.contains(r#"<guid isPermaLink="false">42</guid>"#));
    }

    #[test]
    fn test_empty_channel_has_no_items() {
        let rss = test_document(Vec::new()).to_rss().unwrap();
        assert_eq!(rss.matches("<item>").count(), 0);
        assert!(rss.contains("<channel>"));
    }

    #[test]
    fn test_text_content_is_escaped() {
        let mut item = test_item(7, "AT&T <rumors>");
        item.description = r#"<p>"quoted" & dangerous</p>"#.to_string();
        let rss = test_document(vec![item]).to_rss().unwrap();

        assert!(rss.contains("AT&amp;T &lt;rumors&gt;"));
        assert!(rss.contains("&lt;p&gt;"));
        assert!(!rss.contains("<p>\"quoted\""));
    }
}
