use sha2::{Digest, Sha256};

/// Calculate the hex encoded SHA-256 digest of some data.
pub fn sha256_hex(data: impl AsRef<[u8]>) -> String {
    hex::encode(Sha256::digest(data.as_ref()))
}

/// Incrementally feed length-prefixed fields, so that adjacent fields cannot collide.
#[derive(Default, Clone)]
pub struct FieldHasher {
    digest: Sha256,
}

impl FieldHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&mut self, value: impl AsRef<[u8]>) -> &mut Self {
        let value = value.as_ref();
        self.digest.update((value.len() as u64).to_be_bytes());
        self.digest.update(value);
        self
    }

    pub fn optional(&mut self, value: Option<impl AsRef<[u8]>>) -> &mut Self {
        match value {
            Some(value) => {
                self.digest.update([1]);
                self.field(value)
            }
            None => {
                self.digest.update([0]);
                self
            }
        }
    }

    pub fn finish(self) -> String {
        hex::encode(self.digest.finalize())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn known_digest() {
        assert_eq!(
            sha256_hex(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn fields_do_not_collide() {
        let mut a = FieldHasher::new();
        a.field("ab").field("c");
        let mut b = FieldHasher::new();
        b.field("a").field("bc");
        assert_ne!(a.finish(), b.finish());

        let mut a = FieldHasher::new();
        a.optional(None::<&str>);
        let mut b = FieldHasher::new();
        b.optional(Some(""));
        assert_ne!(a.finish(), b.finish());
    }
}
