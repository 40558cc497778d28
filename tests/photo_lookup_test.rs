use tripweaver_api::models::trip::{Coordinates, Location};
use tripweaver_api::services::photos::{photos_for_locations, PhotoError, PhotoLookup};

/// Stand-in for the photo backend: answers from a fixed table and fails
/// for one specific title.
struct CannedLookup;

impl PhotoLookup for CannedLookup {
    async fn search(
        &self,
        query: &str,
        _near: Option<Coordinates>,
    ) -> Result<Vec<String>, PhotoError> {
        match query {
            "Castle of São Jorge" => Err(PhotoError::ResponseError(
                "Photo search failed with status 500".to_string(),
            )),
            "Miradouro da Graça" => Ok(Vec::new()),
            other => Ok(vec![format!(
                "https://live.staticflickr.com/65535/{}_abc_b.jpg",
                other.len()
            )]),
        }
    }
}

fn location(title: &str) -> Location {
    Location {
        title: title.to_string(),
        description: format!("{} in Lisbon", title),
        location: "Lisbon".to_string(),
        coordinates: Some(Coordinates {
            lat: 38.71,
            lng: -9.13,
        }),
    }
}

#[actix_rt::test]
async fn failed_lookup_degrades_to_empty_list_without_failing_the_batch() {
    let locations = vec![
        location("Belém Tower"),
        location("Castle of São Jorge"),
        location("Time Out Market"),
    ];

    let results = photos_for_locations(&CannedLookup, &locations).await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[1].title, "Castle of São Jorge");
    assert!(results[1].urls.is_empty());
    assert!(!results[0].urls.is_empty());
    assert!(!results[2].urls.is_empty());
}

#[actix_rt::test]
async fn results_preserve_input_order_and_titles() {
    let locations = vec![
        location("Miradouro da Graça"),
        location("Belém Tower"),
    ];

    let results = photos_for_locations(&CannedLookup, &locations).await;

    let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Miradouro da Graça", "Belém Tower"]);
    // An empty backend answer is a valid result, same as a failure.
    assert!(results[0].urls.is_empty());
}

#[actix_rt::test]
async fn empty_batch_yields_empty_results() {
    let results = photos_for_locations(&CannedLookup, &[]).await;
    assert!(results.is_empty());
}
