use curl::easy::Easy;

use crate::{
    data_types::{common::ActivityId, stats::StatsPayload},
    error::FetchError,
};

pub struct Api;

impl Api {
    fn get_request(url: &str) -> Result<Vec<u8>, FetchError> {
        let mut handle = Easy::new();

        handle.url(url)?;
        handle.get(true)?;
        handle.follow_location(true)?;

        let mut buffer_response = Vec::new();
        {
            let mut transfer = handle.transfer();

            transfer.write_function(|data| {
                buffer_response.extend_from_slice(data);
                Ok(data.len())
            })?;

            transfer.perform()?;
        }

        // 0 for non-HTTP schemes such as file://
        let status = handle.response_code()?;
        if status != 0 && !(200..300).contains(&status) {
            return Err(FetchError::Status(status));
        }

        Ok(buffer_response)
    }

    pub fn parse_stats(body: &[u8]) -> Result<StatsPayload, FetchError> {
        let s = std::str::from_utf8(body)?;
        Ok(serde_json::from_str(s)?)
    }

    /// Blocking download of the published stats document.
    pub fn fetch_stats(url: &str) -> Result<StatsPayload, FetchError> {
        Api::parse_stats(&Api::get_request(url)?)
    }

    pub async fn fetch_stats_async(url: String) -> Result<StatsPayload, FetchError> {
        tokio::task::spawn_blocking(move || Api::fetch_stats(&url))
            .await
            .map_err(|err| FetchError::Task(err.to_string()))?
    }

    pub fn activity_url(link_base: &str, id: ActivityId) -> String {
        format!("{}{}", link_base, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_body() {
        let payload = Api::parse_stats(
            br#"{"total_mi": 1.5, "last_updated": "2022-01-01T00:00:00Z", "activities": []}"#,
        )
        .unwrap();
        assert_eq!(payload.total_mi, 1.5);
    }

    #[test]
    fn rejects_other_documents() {
        assert!(matches!(Api::parse_stats(b"[1, 2, 3]"), Err(FetchError::Parse(_))));
        assert!(matches!(Api::parse_stats(&[0xff, 0xfe]), Err(FetchError::Utf8(_))));
    }

    #[test]
    fn unreachable_host_is_a_transport_error() {
        assert!(matches!(
            Api::fetch_stats("http://127.0.0.1:1/stats.json"),
            Err(FetchError::Transport(_))
        ));
    }

    #[test]
    fn builds_activity_links() {
        assert_eq!(
            Api::activity_url("https://www.strava.com/activities/", 7309),
            "https://www.strava.com/activities/7309"
        );
    }
}
