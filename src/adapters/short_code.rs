use rand::distr::Alphanumeric;
use rand::Rng;

pub const SHORT_CODE_LEN: usize = 10;

/// Random URL-safe public identifier. 62^10 codes make collisions
/// overwhelmingly improbable; the unique index on the store catches the
/// remainder and the caller retries with a fresh code.
pub fn generate() -> String {
    let mut rng = rand::rng();
    (0..SHORT_CODE_LEN)
        .map(|_| rng.sample(Alphanumeric) as char)
        .collect()
}
