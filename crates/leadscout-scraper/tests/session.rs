//! End-to-end runs of `LeadScraper` against a scripted browser.

mod common;

use common::{dentists, fast_settings, FakeBrowser, FakeListing, FeedBehaviour, Page};
use leadscout_core::LogEvent;
use leadscout_scraper::{
    EventLog, ExtractionRules, LeadScraper, ScrapeRequest, ScraperError, StopSignal,
};

fn scraper() -> LeadScraper {
    LeadScraper::new(ExtractionRules::default(), fast_settings()).expect("default rules are valid")
}

fn statuses(events: &[LogEvent]) -> Vec<&str> {
    events
        .iter()
        .filter_map(|e| match e {
            LogEvent::Status(s) => Some(s.as_str()),
            _ => None,
        })
        .collect()
}

fn assert_single_trailing_done(events: &[LogEvent]) {
    let dones = events.iter().filter(|e| e.is_done()).count();
    assert_eq!(dones, 1, "expected exactly one Done, got {dones}");
    assert!(events.last().is_some_and(LogEvent::is_done), "Done must be last");
}

#[test]
fn walks_three_scroll_rounds_and_skips_the_nameless_listing() {
    let mut listings = dentists(45);
    listings[17] = FakeListing::default();
    let mut browser = FakeBrowser::new(listings, 20);
    let request = ScrapeRequest::new("Dentists", "Denver").unwrap();
    let log = EventLog::new();

    let leads = scraper()
        .run(&mut browser, &request, &StopSignal::new(), &log)
        .unwrap();

    assert_eq!(leads.len(), 44);
    assert_eq!(leads[0].name, "Dentist 0");
    assert_eq!(leads[0].phone.as_deref(), Some("+1 303 555 0000"));
    assert_eq!(leads[0].website.as_deref(), Some("https://dentist0.test"));
    assert_eq!(leads[3].rating, Some(4.3));
    assert_eq!(leads[3].review_count, Some(13));
    assert!(leads.iter().all(|l| l.email.is_none() && l.social_links.is_none()));
    assert!(!leads.iter().any(|l| l.name == "Dentist 17"));

    // Two growth scrolls, then three stagnant ones.
    assert_eq!(browser.scrolls, 5);
    assert!(browser.fetched.is_empty(), "no enrichment without deep search");

    let events = log.events();
    assert_eq!(
        events.iter().filter(|e| matches!(e, LogEvent::Lead(_))).count(),
        44
    );
    assert!(events.iter().any(|e| matches!(e, LogEvent::Progress { .. })));
    assert!(!events.iter().any(|e| matches!(e, LogEvent::Enrich { .. })));
    assert!(statuses(&events).contains(&"Captured: Dentist 44"));
    assert_single_trailing_done(&events);
}

#[test]
fn result_cap_stops_processing() {
    let mut browser = FakeBrowser::new(dentists(30), 20);
    let request = ScrapeRequest::new("Dentists", "Denver")
        .unwrap()
        .with_max_results(5);
    let log = EventLog::new();

    let leads = scraper()
        .run(&mut browser, &request, &StopSignal::new(), &log)
        .unwrap();

    assert_eq!(leads.len(), 5);
    assert_eq!(browser.scrolls, 0);
    assert_single_trailing_done(&log.events());
}

#[test]
fn stop_request_ends_the_run_with_partial_results() {
    let stop = StopSignal::new();
    let mut browser = FakeBrowser::new(dentists(40), 20).stopping_after(3, stop.clone());
    let request = ScrapeRequest::new("Dentists", "Denver").unwrap();
    let log = EventLog::new();

    let leads = scraper().run(&mut browser, &request, &stop, &log).unwrap();

    assert_eq!(leads.len(), 3);
    let events = log.events();
    assert!(statuses(&events).contains(&"Scrape stopped by user."));
    assert_single_trailing_done(&events);
}

#[test]
fn stop_before_start_captures_nothing() {
    let stop = StopSignal::new();
    stop.request();
    let mut browser = FakeBrowser::new(dentists(5), 5);
    let request = ScrapeRequest::new("Dentists", "Denver").unwrap();
    let log = EventLog::new();

    let leads = scraper().run(&mut browser, &request, &stop, &log).unwrap();

    assert!(leads.is_empty());
    assert_single_trailing_done(&log.events());
}

#[test]
fn deep_search_enriches_and_tolerates_timeouts() {
    let listings = vec![
        FakeListing::named("Smile Dental").with_website("https://smile.test"),
        FakeListing::named("Slow Dental").with_website("https://slow.test"),
        FakeListing::named("Walk-in Dental"),
    ];
    let mut browser = FakeBrowser::new(listings, 10)
        .with_page(
            "https://smile.test",
            Page::Body(
                r#"<a href="mailto:hi@smile.test">mail</a>
                   <a href="https://www.instagram.com/smile">ig</a>"#
                    .to_owned(),
            ),
        )
        .with_page("https://slow.test", Page::TimesOut);
    let request = ScrapeRequest::new("Dentists", "Denver")
        .unwrap()
        .with_deep_search(true);
    let log = EventLog::new();

    let leads = scraper()
        .run(&mut browser, &request, &StopSignal::new(), &log)
        .unwrap();

    assert_eq!(leads.len(), 3);
    assert_eq!(leads[0].email.as_deref(), Some("hi@smile.test"));
    assert_eq!(
        leads[0].social_links.as_deref(),
        Some(&["https://www.instagram.com/smile".to_owned()][..])
    );
    assert!(leads[1].email.is_none());
    assert!(leads[1].social_links.is_none());
    assert!(leads[2].website.is_none());
    assert_eq!(browser.fetched, vec!["https://smile.test", "https://slow.test"]);

    let events = log.events();
    let enrich_names: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            LogEvent::Enrich { name, .. } => Some(name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(enrich_names, vec!["Smile Dental", "Slow Dental", "Walk-in Dental"]);
    assert!(statuses(&events).contains(&"Website not found"));
    assert_single_trailing_done(&events);
}

#[test]
fn failing_listing_is_reported_and_skipped() {
    let mut listings = dentists(4);
    let failing = listings[1].clone().failing();
    listings[1] = failing;
    let mut browser = FakeBrowser::new(listings, 10);
    let request = ScrapeRequest::new("Dentists", "Denver").unwrap();
    let log = EventLog::new();

    let leads = scraper()
        .run(&mut browser, &request, &StopSignal::new(), &log)
        .unwrap();

    let names: Vec<&str> = leads.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Dentist 0", "Dentist 2", "Dentist 3"]);
    let events = log.events();
    assert!(statuses(&events)
        .iter()
        .any(|s| s.starts_with("Lead extraction failed:")));
    assert_single_trailing_done(&events);
}

#[test]
fn duplicate_listings_are_captured_once() {
    let first = FakeListing::named("Acme Dental").with_phone("555-0100");
    let listings = vec![first.clone(), FakeListing::named("Other Dental"), first];
    let mut browser = FakeBrowser::new(listings, 10);
    let request = ScrapeRequest::new("Dentists", "Denver").unwrap();
    let log = EventLog::new();

    let leads = scraper()
        .run(&mut browser, &request, &StopSignal::new(), &log)
        .unwrap();

    let names: Vec<&str> = leads.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Acme Dental", "Other Dental"]);
}

#[test]
fn duplicate_listing_is_not_enriched_twice() {
    let first = FakeListing::named("Smile Dental").with_website("https://smile.test");
    let mut browser = FakeBrowser::new(vec![first.clone(), first], 10).with_page(
        "https://smile.test",
        Page::Body(r#"<a href="mailto:hi@smile.test">mail</a>"#.to_owned()),
    );
    let request = ScrapeRequest::new("Dentists", "Denver")
        .unwrap()
        .with_deep_search(true);
    let log = EventLog::new();

    let leads = scraper()
        .run(&mut browser, &request, &StopSignal::new(), &log)
        .unwrap();

    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0].email.as_deref(), Some("hi@smile.test"));
    assert_eq!(browser.fetched, vec!["https://smile.test"]);
    let enrich_count = log
        .events()
        .iter()
        .filter(|e| matches!(e, LogEvent::Enrich { .. }))
        .count();
    assert_eq!(enrich_count, 1);
}

#[test]
fn failed_scroll_is_reported_instead_of_progress() {
    let mut browser = FakeBrowser::new(dentists(45), 20).failing_scroll();
    let request = ScrapeRequest::new("Dentists", "Denver").unwrap();
    let log = EventLog::new();

    let leads = scraper()
        .run(&mut browser, &request, &StopSignal::new(), &log)
        .unwrap();

    assert_eq!(leads.len(), 20);
    assert_eq!(browser.scrolls, 3, "stagnation still ends the run");

    let events = log.events();
    assert!(!events.iter().any(|e| matches!(e, LogEvent::Progress { .. })));
    let scroll_failures = statuses(&events)
        .into_iter()
        .filter(|s| s.starts_with("Feed scroll failed:"))
        .count();
    assert_eq!(scroll_failures, 3);
    assert_single_trailing_done(&events);
}

#[test]
fn unreadable_listings_after_scroll_keep_the_previous_snapshot() {
    let mut browser = FakeBrowser::new(dentists(45), 20).failing_listings_after_scroll();
    let request = ScrapeRequest::new("Dentists", "Denver").unwrap();
    let log = EventLog::new();

    let leads = scraper()
        .run(&mut browser, &request, &StopSignal::new(), &log)
        .unwrap();

    assert_eq!(leads.len(), 20);
    assert_eq!(leads[19].name, "Dentist 19");
    assert_eq!(browser.scrolls, 3);

    let events = log.events();
    let progress = events
        .iter()
        .filter(|e| matches!(e, LogEvent::Progress { .. }))
        .count();
    assert_eq!(progress, 3, "the scrolls themselves succeeded");
    assert!(!statuses(&events)
        .iter()
        .any(|s| s.starts_with("Feed scroll failed:")));
    assert_single_trailing_done(&events);
}

#[test]
fn rating_falls_back_to_card_text() {
    let mut listing = FakeListing::named("Inline Dental");
    listing.card_text = "Inline Dental\n4.7(1,234) · Dentist".to_owned();
    let mut browser = FakeBrowser::new(vec![listing], 10);
    let request = ScrapeRequest::new("Dentists", "Denver").unwrap();

    let leads = scraper()
        .run(&mut browser, &request, &StopSignal::new(), &EventLog::new())
        .unwrap();

    assert_eq!(leads[0].rating, Some(4.7));
    assert_eq!(leads[0].review_count, Some(1234));
}

#[test]
fn missing_feed_yields_no_leads() {
    let mut browser = FakeBrowser::new(dentists(3), 3).with_feed(FeedBehaviour::Missing);
    let request = ScrapeRequest::new("Dentists", "Atlantis").unwrap();
    let log = EventLog::new();

    let leads = scraper()
        .run(&mut browser, &request, &StopSignal::new(), &log)
        .unwrap();

    assert!(leads.is_empty());
    let events = log.events();
    assert!(statuses(&events).contains(&"No results feed found."));
    assert_single_trailing_done(&events);
}

#[test]
fn broken_feed_is_fatal_but_still_sends_done() {
    let mut browser = FakeBrowser::new(dentists(3), 3).with_feed(FeedBehaviour::Broken);
    let request = ScrapeRequest::new("Dentists", "Denver").unwrap();
    let log = EventLog::new();

    let err = scraper()
        .run(&mut browser, &request, &StopSignal::new(), &log)
        .unwrap_err();

    assert!(matches!(err, ScraperError::Browser { .. }), "got: {err:?}");
    let events = log.events();
    assert!(statuses(&events)
        .iter()
        .any(|s| s.starts_with("Scrape failed:")));
    assert_single_trailing_done(&events);
}

#[test]
fn blank_keyword_is_rejected() {
    let err = ScrapeRequest::new("  ", "Denver").unwrap_err();
    assert_eq!(err.to_string(), "Keyword and location are required.");
}
