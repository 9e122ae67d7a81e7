use crate::analysis::ProfileId;

/// Profiles tracked by the scraper.
///
/// When the list is empty every active profile of the career standings is
/// tracked. To find a profile ID, open the player on https://axescores.com;
/// the URL is `https://axescores.com/player/{id}`.
const TRACKED_PROFILE_IDS: &[ProfileId] = &[];

pub fn get_profile_ids() -> Vec<ProfileId> {
    TRACKED_PROFILE_IDS.to_vec()
}

/// Whether a standings entry should be scraped given the tracked list
pub fn is_tracked(tracked: &[ProfileId], profile_id: ProfileId) -> bool {
    tracked.is_empty() || tracked.contains(&profile_id)
}

/// Parses a comma separated list of ids, skipping blanks and junk
pub fn parse_id_list(value: &str) -> Vec<i64> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse() {
            Ok(id) => Some(id),
            Err(_) => {
                log::warn!("Ignoring invalid id in list: {}", s);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_tracks_everyone() {
        assert!(is_tracked(&[], 42));
        assert!(is_tracked(&[1, 42], 42));
        assert!(!is_tracked(&[1, 2], 42));
    }

    #[test]
    fn test_parse_id_list() {
        assert_eq!(parse_id_list("1, 2,,3 "), vec![1, 2, 3]);
        assert_eq!(parse_id_list("7,abc,8"), vec![7, 8]);
        assert!(parse_id_list("").is_empty());
    }
}
