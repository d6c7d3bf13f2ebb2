//! Unit tests for signal id generation

use rangefilter::signals::generate_signal_id;

#[test]
fn test_signal_id_layout() {
    for _ in 0..50 {
        let id = generate_signal_id();
        let chars: Vec<char> = id.chars().collect();
        assert_eq!(chars.len(), 19, "{}", id);

        for group in 0..5 {
            let base = group * 3;
            assert!(chars[base].is_ascii_digit() && chars[base] != '0', "{}", id);
            assert!(chars[base + 1].is_ascii_digit(), "{}", id);
            assert!(chars[base + 2].is_ascii_uppercase(), "{}", id);
        }
        assert!(chars[15..].iter().all(|c| c.is_ascii_digit()), "{}", id);
    }
}

#[test]
fn test_signal_ids_differ() {
    assert_ne!(generate_signal_id(), generate_signal_id());
}
