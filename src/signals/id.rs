//! Human-friendly signal identifiers.

use uuid::Uuid;

/// Random id of seven two-digit numbers and five uppercase letters, laid
/// out as `NN L NN L NN L NN L NN L NN NN` (19 characters, no separators).
pub fn generate_signal_id() -> String {
    let bytes = Uuid::new_v4().into_bytes();
    let numbers: Vec<u8> = bytes[..7].iter().map(|b| 10 + b % 90).collect();
    let letters: Vec<char> = bytes[7..12]
        .iter()
        .map(|b| char::from(b'A' + b % 26))
        .collect();

    let mut id = String::with_capacity(19);
    for i in 0..5 {
        id.push_str(&numbers[i].to_string());
        id.push(letters[i]);
    }
    id.push_str(&numbers[5].to_string());
    id.push_str(&numbers[6].to_string());
    id
}
