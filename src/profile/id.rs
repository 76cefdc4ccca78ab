use rand::Rng;

const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of every public profile id.
pub const PROFILE_ID_LEN: usize = 8;

/// Generate a random 8-character alphanumeric profile id.
///
/// Not a secret: ids only need to be hard to guess by accident.
pub fn generate_profile_id() -> String {
    let mut rng = rand::thread_rng();
    (0..PROFILE_ID_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Whether `id` has the shape of a profile id.
///
/// Ids that fail this never reach the store, which also keeps them out of
/// file paths.
pub fn is_valid_profile_id(id: &str) -> bool {
    id.len() == PROFILE_ID_LEN && id.bytes().all(|b| b.is_ascii_alphanumeric())
}
