//! CSV report generation.
//!
//! Reports mirror what the dashboard shows: the filtered post list, or the
//! tracking payload of a single crawl item. Every field is quoted and
//! embedded quotes are doubled, so captions and comments with commas or
//! newlines survive a spreadsheet import.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::models::{CrawlItem, Post};

/// A rendered report, ready to be written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub filename: String,
    pub contents: String,
}

impl Report {
    /// Write the report into `dir`, returning the full path.
    pub fn write_to(&self, dir: &Path) -> io::Result<PathBuf> {
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.contents)?;
        Ok(path)
    }
}

/// Row-oriented CSV builder. All cells quoted, `"` doubled, rows joined
/// with `\n` and no trailing newline.
#[derive(Debug, Default)]
struct CsvBuilder {
    lines: Vec<String>,
}

impl CsvBuilder {
    fn row<S: AsRef<str>>(&mut self, cells: &[S]) {
        let line = cells
            .iter()
            .map(|cell| format!("\"{}\"", cell.as_ref().replace('"', "\"\"")))
            .collect::<Vec<_>>()
            .join(",");
        self.lines.push(line);
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn finish(self) -> String {
        self.lines.join("\n")
    }
}

fn date_stamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d").to_string()
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn percent(confidence: f64) -> String {
    format!("{}%", (confidence * 100.0).round() as i64)
}

/// Report over the currently visible posts, in their display order.
pub fn posts_report(posts: &[Post], now: DateTime<Utc>) -> Report {
    let mut csv = CsvBuilder::default();
    csv.row(&[
        "Username",
        "Posted At",
        "Caption",
        "Should Engage",
        "Suggested Comment",
        "Tone",
        "Tone Emoji",
        "Confidence",
        "URL",
        "Comment Type",
    ]);
    for post in posts {
        csv.row(&[
            post.username.as_str(),
            &timestamp(post.posted_at),
            post.caption.as_deref().unwrap_or(""),
            if post.should_engage { "Yes" } else { "No" },
            post.suggested_comment.as_deref().unwrap_or(""),
            &post.tone_description,
            &post.tone_emoji,
            &percent(post.analysis_confidence),
            post.post_url.as_deref().unwrap_or(""),
            &post.comment_freshness,
        ]);
    }
    Report {
        filename: format!("scout-posts-{}.csv", date_stamp(now)),
        contents: csv.finish(),
    }
}

/// Report for a tracked post: captured comments plus a summary block.
pub fn crawl_post_report(item: &CrawlItem, now: DateTime<Utc>) -> Report {
    let data = item.tracking_data.clone().unwrap_or_default();

    let mut csv = CsvBuilder::default();
    csv.row(&[
        "Comment ID",
        "Username",
        "Comment Text",
        "Timestamp",
        "Detected Emojis",
    ]);
    for comment in &data.comments {
        csv.row(&[
            comment.id.to_string(),
            comment.username.clone(),
            comment.text.clone(),
            timestamp(comment.timestamp),
            comment.reactions.join(", "),
        ]);
    }

    let top_emojis = data
        .engagement_stats
        .emoji_breakdown
        .iter()
        .map(|(emoji, count)| format!("{}: {}", emoji, count))
        .collect::<Vec<_>>()
        .join(", ");

    csv.blank();
    csv.row(&["SUMMARY STATISTICS"]);
    csv.row(&["Total Comments", &item.comments_found.to_string()]);
    csv.row(&["Total Reactions", &item.reactions_found.to_string()]);
    csv.row(&["Unique Users", &item.unique_users.to_string()]);
    csv.row(&["Top Emojis", &top_emojis]);

    Report {
        filename: format!("crawl-post-{}-{}.csv", item.id, date_stamp(now)),
        contents: csv.finish(),
    }
}

/// Report for a tracked user: captured posts plus a summary block.
pub fn crawl_user_report(item: &CrawlItem, now: DateTime<Utc>) -> Report {
    let data = item.tracking_data.clone().unwrap_or_default();
    let username = item.username.as_deref().unwrap_or("");

    let mut csv = CsvBuilder::default();
    csv.row(&["Post ID", "Caption", "Engagement", "Posted At"]);
    for post in &data.posts {
        csv.row(&[
            post.id.to_string(),
            post.caption.clone(),
            post.engagement.to_string(),
            timestamp(post.posted_at),
        ]);
    }

    csv.blank();
    csv.row(&["USER STATISTICS"]);
    csv.row(&["Username", username]);
    csv.row(&["Total Posts", &item.posts_found.to_string()]);
    csv.row(&["Total Interactions", &item.interactions.to_string()]);
    csv.row(&[
        "Average Engagement".to_string(),
        data.activity_stats.avg_engagement.to_string(),
    ]);
    csv.row(&[
        "Posting Frequency",
        data.activity_stats
            .posting_frequency
            .as_deref()
            .unwrap_or("unknown"),
    ]);
    csv.row(&["Common Hashtags", &data.activity_stats.hashtag_usage.join(", ")]);

    Report {
        filename: format!("crawl-user-{}-{}.csv", username, date_stamp(now)),
        contents: csv.finish(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ActivityStats, EngagementStats, TrackedComment, TrackedPost, TrackingData,
    };
    use chrono::TimeZone;

    fn sample_post() -> Post {
        Post {
            id: 1,
            username: "alice".into(),
            posted_at: Utc.with_ymd_and_hms(2026, 8, 20, 9, 30, 0).unwrap(),
            caption: Some("she said \"hi\", twice".into()),
            display_image_url: None,
            post_url: Some("https://instagram.com/p/abc".into()),
            should_engage: true,
            suggested_comment: Some("Love this!".into()),
            tone_emoji: "😊".into(),
            tone_description: "positive".into(),
            analysis_confidence: 0.876,
            comment_freshness: "fresh".into(),
        }
    }

    #[test]
    fn posts_report_quotes_every_cell_and_doubles_quotes() {
        let now = Utc.with_ymd_and_hms(2026, 8, 25, 15, 0, 0).unwrap();
        let report = posts_report(&[sample_post()], now);

        assert_eq!(report.filename, "scout-posts-2026-08-25.csv");
        let mut lines = report.contents.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("\"Username\",\"Posted At\""));
        assert!(header.ends_with("\"URL\",\"Comment Type\""));

        let row = lines.next().unwrap();
        assert!(row.contains("\"she said \"\"hi\"\", twice\""));
        assert!(row.contains("\"Yes\""));
        assert!(row.contains("\"88%\""));
        assert!(lines.next().is_none());
    }

    #[test]
    fn empty_posts_report_is_header_only() {
        let now = Utc.with_ymd_and_hms(2026, 8, 25, 15, 0, 0).unwrap();
        let report = posts_report(&[], now);
        assert_eq!(report.contents.lines().count(), 1);
    }

    #[test]
    fn crawl_post_report_appends_summary_block() {
        let now = Utc.with_ymd_and_hms(2026, 8, 25, 15, 0, 0).unwrap();
        let mut item = crawl_item(CrawlKindFixture::Post);
        item.tracking_data = Some(TrackingData {
            comments: vec![TrackedComment {
                id: 10,
                username: "bob".into(),
                text: "nice \"shot\"".into(),
                timestamp: Utc.with_ymd_and_hms(2026, 8, 24, 8, 0, 0).unwrap(),
                reactions: vec!["🔥".into(), "❤️".into()],
            }],
            engagement_stats: EngagementStats {
                emoji_breakdown: [("❤️".to_string(), 3), ("🔥".to_string(), 5)]
                    .into_iter()
                    .collect(),
            },
            ..Default::default()
        });

        let report = crawl_post_report(&item, now);
        assert_eq!(report.filename, "crawl-post-42-2026-08-25.csv");
        assert!(report.contents.contains("\"nice \"\"shot\"\"\""));
        assert!(report.contents.contains("\"🔥, ❤️\""));

        let lines: Vec<&str> = report.contents.split('\n').collect();
        let blank = lines.iter().position(|l| l.is_empty()).unwrap();
        assert_eq!(lines[blank + 1], "\"SUMMARY STATISTICS\"");
        assert_eq!(lines[blank + 2], "\"Total Comments\",\"7\"");
        assert!(lines.last().unwrap().starts_with("\"Top Emojis\""));
        // BTreeMap ordering keeps the emoji summary stable
        assert!(lines.last().unwrap().contains("🔥: 5"));
    }

    #[test]
    fn crawl_user_report_summary_and_filename() {
        let now = Utc.with_ymd_and_hms(2026, 8, 25, 15, 0, 0).unwrap();
        let mut item = crawl_item(CrawlKindFixture::User);
        item.tracking_data = Some(TrackingData {
            posts: vec![TrackedPost {
                id: 3,
                caption: "beach day".into(),
                engagement: 120,
                posted_at: Utc.with_ymd_and_hms(2026, 8, 23, 10, 0, 0).unwrap(),
            }],
            activity_stats: ActivityStats {
                avg_engagement: 87.5,
                posting_frequency: None,
                hashtag_usage: vec!["#travel".into(), "#sun".into()],
            },
            ..Default::default()
        });

        let report = crawl_user_report(&item, now);
        assert_eq!(report.filename, "crawl-user-carol-2026-08-25.csv");
        assert!(report.contents.contains("\"Username\",\"carol\""));
        assert!(report.contents.contains("\"Average Engagement\",\"87.5\""));
        assert!(report.contents.contains("\"Posting Frequency\",\"unknown\""));
        assert!(report.contents.contains("\"Common Hashtags\",\"#travel, #sun\""));
    }

    #[test]
    fn report_writes_to_directory() {
        let now = Utc.with_ymd_and_hms(2026, 8, 25, 15, 0, 0).unwrap();
        let report = posts_report(&[sample_post()], now);
        let dir = tempfile::tempdir().unwrap();
        let path = report.write_to(dir.path()).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), report.contents);
    }

    enum CrawlKindFixture {
        Post,
        User,
    }

    fn crawl_item(kind: CrawlKindFixture) -> CrawlItem {
        use crate::models::CrawlKind;
        match kind {
            CrawlKindFixture::Post => CrawlItem {
                id: 42,
                kind: CrawlKind::Post,
                description: None,
                status: "active".into(),
                created_at: Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap(),
                last_crawl: None,
                url: Some("https://instagram.com/p/xyz".into()),
                comments_found: 7,
                reactions_found: 8,
                unique_users: 5,
                username: None,
                posts_found: 0,
                interactions: 0,
                tracking_data: None,
            },
            CrawlKindFixture::User => CrawlItem {
                id: 43,
                kind: CrawlKind::User,
                description: None,
                status: "active".into(),
                created_at: Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap(),
                last_crawl: None,
                url: None,
                comments_found: 0,
                reactions_found: 0,
                unique_users: 0,
                username: Some("carol".into()),
                posts_found: 14,
                interactions: 260,
                tracking_data: None,
            },
        }
    }
}
