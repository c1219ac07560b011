use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use codeplex_migrator::{
    CallThrottle, CodePlexReader, CreatedIssue, Formatter, HttpFetcher, IssueTracker, LabelRules,
    PageFetcher, ProjectUrls, ProvenanceTemplates, ReplayError, ReplayWorker, Runner,
    SourceError, ThreadStyle,
};
use url::Url;

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    std::fs::read_to_string(path).unwrap()
}

fn sample_urls() -> ProjectUrls {
    ProjectUrls::with_base("sample", Url::parse("http://sample.test/").unwrap())
}

/// Serves canned CodePlex pages and records every request.
#[derive(Default)]
struct FakeCodePlex {
    count_page: String,
    listing_pages: Vec<String>,
    details: HashMap<u32, String>,
    default_detail: Option<String>,
    requests: Mutex<Vec<Url>>,
}

impl FakeCodePlex {
    fn sample() -> Self {
        let listing = fixture("listing.html");
        Self {
            count_page: listing.clone(),
            listing_pages: vec![listing],
            details: [1, 2, 5]
                .into_iter()
                .map(|id| (id, fixture(&format!("workitem_{id}.html"))))
                .collect(),
            ..Self::default()
        }
    }

    fn requests(&self) -> Vec<Url> {
        self.requests.lock().unwrap().clone()
    }

    fn listing_requests(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter_map(|url| {
                url.query_pairs()
                    .find(|(key, _)| key == "page")
                    .map(|(_, page)| page.into_owned())
            })
            .collect()
    }

    fn detail_requests(&self) -> usize {
        self.requests()
            .iter()
            .filter(|url| detail_id(url).is_some())
            .count()
    }
}

fn detail_id(url: &Url) -> Option<u32> {
    url.path().strip_prefix("/workitem/")?.parse().ok()
}

#[async_trait]
impl PageFetcher for FakeCodePlex {
    async fn fetch(&self, url: &Url) -> Result<String, SourceError> {
        self.requests.lock().unwrap().push(url.clone());
        let not_found = || SourceError::Status {
            url: url.to_string(),
            status: 404,
        };

        if let Some(id) = detail_id(url) {
            return self
                .details
                .get(&id)
                .or(self.default_detail.as_ref())
                .cloned()
                .ok_or_else(not_found);
        }

        if url.path() != "/workitem/list/advanced" {
            return Err(not_found());
        }
        match url.query_pairs().find(|(key, _)| key == "page") {
            None => Ok(self.count_page.clone()),
            Some((_, page)) => page
                .parse::<usize>()
                .ok()
                .and_then(|page| self.listing_pages.get(page))
                .cloned()
                .ok_or_else(not_found),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Create { title: String, body: String, labels: Vec<String> },
    Comment { number: u64, body: String },
    Close { number: u64 },
}

#[derive(Default)]
struct RecordingTracker {
    calls: Mutex<Vec<Call>>,
}

impl RecordingTracker {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn created_titles(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Create { title, .. } => Some(title),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl IssueTracker for RecordingTracker {
    async fn create_issue(
        &self,
        title: &str,
        body: &str,
        labels: &[String],
    ) -> Result<CreatedIssue, ReplayError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(Call::Create {
            title: title.to_string(),
            body: body.to_string(),
            labels: labels.to_vec(),
        });
        let number = calls
            .iter()
            .filter(|call| matches!(call, Call::Create { .. }))
            .count() as u64;
        Ok(CreatedIssue {
            number,
            url: format!("https://github.com/owner/repo/issues/{number}"),
        })
    }

    async fn create_comment(&self, number: u64, body: &str) -> Result<(), ReplayError> {
        self.calls.lock().unwrap().push(Call::Comment {
            number,
            body: body.to_string(),
        });
        Ok(())
    }

    async fn close_issue(&self, number: u64) -> Result<(), ReplayError> {
        self.calls.lock().unwrap().push(Call::Close { number });
        Ok(())
    }
}

fn runner(fetcher: FakeCodePlex) -> Runner<FakeCodePlex, RecordingTracker> {
    let reader = CodePlexReader::new(fetcher, sample_urls());
    let formatter = Formatter::new(
        "sample",
        LabelRules::default(),
        &ProvenanceTemplates::default(),
    )
    .unwrap();
    let worker = ReplayWorker::new(RecordingTracker::default(), CallThrottle::disabled());
    Runner::new(reader, formatter, worker)
}

fn listing_row(id: u32) -> String {
    format!(
        r#"<tr id="row_checkbox_{id}" class="CheckboxRow">
            <td class="ID">{id}</td>
            <td class="Title"><a id="TitleLink{id}" href="/workitem/{id}">Item {id}</a></td>
            <td class="Status">Active</td>
            <td class="Type">Issue</td>
            <td class="Severity">Low</td>
        </tr>"#
    )
}

fn listing_page(count: u32, ids: impl IntoIterator<Item = u32>) -> String {
    let rows: Vec<String> = ids.into_iter().map(listing_row).collect();
    format!(
        r#"<html><body>
        <div>Showing <span class="Selected">{count}</span> items</div>
        <table><tbody>{}</tbody></table>
        </body></html>"#,
        rows.join("\n")
    )
}

#[tokio::test]
async fn migrates_sample_project_in_order() {
    let mut runner = runner(FakeCodePlex::sample());

    let summary = runner.run().await.unwrap();

    let tracker = runner.worker().tracker();
    assert_eq!(
        tracker.created_titles(),
        vec![
            "Crash when opening \"Settings\"",
            "Typo in readme",
            "Export to CSV",
        ]
    );
    assert_eq!(summary.issues_discovered, 3);
    assert_eq!(summary.issues_created, 3);
    // two comments on #1, one comment plus the closing remark on #5
    assert_eq!(summary.comments_created, 4);
    assert_eq!(summary.issues_closed, 1);
    assert!(!summary.dry_run);

    let calls = tracker.calls();
    assert_eq!(calls.last(), Some(&Call::Close { number: 3 }));
    assert!(calls.contains(&Call::Comment {
        number: 3,
        body: "**[frank](https://www.codeplex.com/site/users/view/frank)** wrote 2013-02-01 at 16:45\nClosed.".to_string(),
    }));
}

#[tokio::test]
async fn issue_bodies_carry_provenance() {
    let mut runner = runner(FakeCodePlex::sample());
    runner.run().await.unwrap();

    let calls = runner.worker().tracker().calls();
    let Call::Create { body, labels, .. } = &calls[0] else {
        panic!("first call must create an issue");
    };
    assert!(body.starts_with(
        "**This issue was imported from [CodePlex](https://sample.codeplex.com/workitem/1)**\n\n\
         **[alice](https://www.codeplex.com/site/users/view/alice)** wrote 2012-03-14 at 17:21\n"
    ));
    assert!(body.contains("Opening the **Settings** dialog crashes the app."));
    assert_eq!(labels, &vec!["CodePlex".to_string()]);

    assert_eq!(
        calls[1],
        Call::Comment {
            number: 1,
            body: "**[bob](https://www.codeplex.com/site/users/view/bob)** wrote 2012-03-15 at 09:02\nConfirmed on version 1.1.".to_string(),
        }
    );

    let export = calls
        .iter()
        .find_map(|call| match call {
            Call::Create { title, labels, .. } if title == "Export to CSV" => Some(labels.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(export, vec!["CodePlex", "enhancement"]);
}

#[tokio::test]
async fn unparsable_report_time_uses_sentinel() {
    let reader = CodePlexReader::new(FakeCodePlex::sample(), sample_urls());

    let issue = reader.issue(2).await.unwrap();

    assert_eq!(issue.reported_by, "dave");
    assert_eq!(issue.reported_at, codeplex_migrator::codeplex::SENTINEL_TIMESTAMP);
    assert_eq!(issue.description, "\"recieve\" should be \"receive\"");
}

#[tokio::test]
async fn pages_through_the_whole_listing() {
    let fetcher = FakeCodePlex {
        count_page: listing_page(150, 1..=100),
        listing_pages: vec![listing_page(150, 1..=100), listing_page(150, 101..=150)],
        default_detail: Some(fixture("workitem_2.html")),
        ..FakeCodePlex::default()
    };
    let reader = CodePlexReader::new(fetcher, sample_urls()).with_concurrency(4);

    let issues = reader.collect_issues().await.unwrap();

    let ids: Vec<u32> = issues.iter().map(|issue| issue.id).collect();
    assert_eq!(ids, (1..=150).collect::<Vec<_>>());
    assert_eq!(reader.fetcher().listing_requests(), vec!["0", "1"]);
    assert_eq!(reader.fetcher().detail_requests(), 150);
}

#[tokio::test]
async fn listing_drops_repeated_and_out_of_order_rows() {
    let fetcher = FakeCodePlex {
        count_page: listing_page(4, []),
        listing_pages: vec![listing_page(4, [3, 1, 3, 7])],
        default_detail: Some(fixture("workitem_2.html")),
        ..FakeCodePlex::default()
    };
    let reader = CodePlexReader::new(fetcher, sample_urls());

    let listed = reader.list_all().await.unwrap();
    let ids: Vec<u32> = listed.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![3, 7]);

    let issues = reader.collect_issues().await.unwrap();
    assert_eq!(issues.len(), 2);
}

#[tokio::test]
async fn single_item_never_touches_the_listing() {
    let fetcher = FakeCodePlex {
        details: HashMap::from([(42, fixture("workitem_1.html"))]),
        ..FakeCodePlex::default()
    };
    let mut runner = runner(fetcher).with_issue_id(Some(42));

    let summary = runner.run().await.unwrap();

    assert_eq!(summary.issues_created, 1);
    let requests = runner.reader().fetcher().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path(), "/workitem/42");
    assert_eq!(
        runner.worker().tracker().created_titles(),
        vec!["Crash when opening \"Settings\""]
    );
}

#[tokio::test]
async fn single_item_has_no_listing_metadata() {
    let reader = CodePlexReader::new(FakeCodePlex::sample(), sample_urls());

    let issue = reader.issue(5).await.unwrap();

    assert_eq!(issue.id, 5);
    assert_eq!(issue.title, "Export to CSV");
    assert_eq!(issue.status, None);
    assert!(!issue.is_closed());
    // closed block is only read for items listed as closed
    assert_eq!(issue.comments.len(), 1);
}

#[tokio::test]
async fn dry_run_makes_no_github_calls() {
    let mut runner = runner(FakeCodePlex::sample()).with_dry_run(true);

    let summary = runner.run().await.unwrap();

    assert!(summary.dry_run);
    assert_eq!(summary.issues_previewed, 3);
    assert_eq!(summary.issues_created, 0);
    assert!(runner.worker().tracker().calls().is_empty());
}

#[tokio::test]
async fn skip_closed_leaves_closed_items_behind() {
    let mut runner = runner(FakeCodePlex::sample()).with_skip_closed(true);

    let summary = runner.run().await.unwrap();

    assert_eq!(summary.issues_skipped, 1);
    assert_eq!(summary.issues_closed, 0);
    assert_eq!(
        runner.worker().tracker().created_titles(),
        vec!["Crash when opening \"Settings\"", "Typo in readme"]
    );
}

#[tokio::test]
async fn inline_thread_style_posts_no_comments() {
    let reader = CodePlexReader::new(FakeCodePlex::sample(), sample_urls());
    let formatter = Formatter::new(
        "sample",
        LabelRules::default().without_source_label(),
        &ProvenanceTemplates::default(),
    )
    .unwrap();
    let worker = ReplayWorker::new(RecordingTracker::default(), CallThrottle::disabled())
        .with_thread_style(ThreadStyle::Inline);
    let mut runner = Runner::new(reader, formatter, worker);

    let summary = runner.run().await.unwrap();

    assert_eq!(summary.comments_created, 0);
    let calls = runner.worker().tracker().calls();
    let Call::Create { body, labels, .. } = &calls[0] else {
        panic!("first call must create an issue");
    };
    assert!(labels.is_empty());
    assert!(body.contains("Confirmed on version 1.1."));
    assert!(!calls.iter().any(|call| matches!(call, Call::Comment { .. })));
}

#[tokio::test]
async fn missing_detail_page_aborts_the_run() {
    let mut fetcher = FakeCodePlex::sample();
    fetcher.details.remove(&2);
    let mut runner = runner(fetcher);

    let result = runner.run().await;

    assert!(result.is_err());
    // the item before the failure was already replayed
    assert_eq!(runner.worker().tracker().created_titles().len(), 1);
}

#[tokio::test]
async fn reads_sample_project_over_http() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workitem/list/advanced"))
        .respond_with(ResponseTemplate::new(200).set_body_string(fixture("listing.html")))
        .mount(&server)
        .await;
    for id in [1, 2, 5] {
        Mock::given(method("GET"))
            .and(path(format!("/workitem/{id}")))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(fixture(&format!("workitem_{id}.html"))),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let urls = ProjectUrls::with_base("sample", Url::parse(&server.uri()).unwrap());
    let reader = CodePlexReader::new(HttpFetcher::new().unwrap(), urls);
    let issues = reader.collect_issues().await.unwrap();

    let ids: Vec<u32> = issues.iter().map(|issue| issue.id).collect();
    assert_eq!(ids, vec![1, 2, 5]);
    assert!(issues[2].is_closed());
    assert_eq!(issues[2].comments.last().unwrap().content(), "Closed.");
}
