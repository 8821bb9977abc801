use crate::config::TrackOrder;

use super::model::Track;

/// Ordinal given to files whose name does not start with a number.
pub const UNNUMBERED: u32 = 99;

/// Parse the leading run of ASCII digits in `file_name` (`"07 - Song.flac"` → 7).
pub fn track_number(file_name: &str) -> u32 {
    let end = file_name
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(file_name.len());
    file_name[..end].parse().unwrap_or(UNNUMBERED)
}

/// Sort `tracks` in place. Both orders are total (ties fall back to the path),
/// so the result only depends on the set of tracks.
pub fn order_tracks(tracks: &mut [Track], order: TrackOrder) {
    match order {
        TrackOrder::Lexicographic => {
            tracks.sort_by(|a, b| a.file_name.cmp(&b.file_name).then_with(|| a.path.cmp(&b.path)));
        }
        TrackOrder::TrackNumber => {
            tracks.sort_by_cached_key(|t| (track_number(&t.file_name), t.path.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tracks: &[Track]) -> Vec<&str> {
        tracks.iter().map(|t| t.file_name.as_str()).collect()
    }

    #[test]
    fn track_number_reads_leading_digits() {
        assert_eq!(track_number("01.flac"), 1);
        assert_eq!(track_number("10 - Outro.flac"), 10);
        assert_eq!(track_number("3rd.flac"), 3);
        assert_eq!(track_number("Intro.flac"), UNNUMBERED);
        assert_eq!(track_number(""), UNNUMBERED);
        assert_eq!(track_number("99999999999999.flac"), UNNUMBERED);
    }

    #[test]
    fn lexicographic_sorts_by_file_name() {
        let mut tracks = vec![
            Track::new("/m/rock/10.flac"),
            Track::new("/m/rock/01.flac"),
            Track::new("/m/rock/02.flac"),
        ];
        order_tracks(&mut tracks, TrackOrder::Lexicographic);
        assert_eq!(names(&tracks), vec!["01.flac", "02.flac", "10.flac"]);
    }

    #[test]
    fn lexicographic_puts_unpadded_numbers_in_string_order() {
        let mut tracks = vec![
            Track::new("/m/2.flac"),
            Track::new("/m/10.flac"),
            Track::new("/m/1.flac"),
        ];
        order_tracks(&mut tracks, TrackOrder::Lexicographic);
        assert_eq!(names(&tracks), vec!["1.flac", "10.flac", "2.flac"]);
    }

    #[test]
    fn track_number_sorts_numerically_and_sends_unnumbered_last() {
        let mut tracks = vec![
            Track::new("/m/Bonus.flac"),
            Track::new("/m/10.flac"),
            Track::new("/m/2.flac"),
            Track::new("/m/1.flac"),
        ];
        order_tracks(&mut tracks, TrackOrder::TrackNumber);
        assert_eq!(names(&tracks), vec!["1.flac", "2.flac", "10.flac", "Bonus.flac"]);
    }

    #[test]
    fn track_number_ties_break_on_path() {
        let mut tracks = vec![
            Track::new("/m/cd2/01.flac"),
            Track::new("/m/cd1/01.flac"),
        ];
        order_tracks(&mut tracks, TrackOrder::TrackNumber);
        assert_eq!(tracks[0].path, std::path::PathBuf::from("/m/cd1/01.flac"));
    }
}
