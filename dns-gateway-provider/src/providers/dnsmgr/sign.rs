//! dnsmgr 表单签名

use md5::{Digest, Md5};

use super::DnsmgrProvider;

impl DnsmgrProvider {
    /// `md5(uid ‖ timestamp ‖ key)`，小写十六进制
    pub(crate) fn sign(&self, timestamp: i64) -> String {
        let mut hasher = Md5::new();
        hasher.update(self.uid.as_bytes());
        hasher.update(timestamp.to_string().as_bytes());
        hasher.update(self.api_key.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// 每个请求都带的鉴权字段
    pub(crate) fn auth_fields(&self, timestamp: i64) -> [(&'static str, String); 3] {
        [
            ("uid", self.uid.clone()),
            ("timestamp", timestamp.to_string()),
            ("sign", self.sign(timestamp)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(uid: &str, key: &str) -> DnsmgrProvider {
        DnsmgrProvider::new(uid.to_string(), key.to_string(), "http://panel.local").unwrap()
    }

    #[test]
    fn sign_matches_concatenated_md5() {
        // md5("1" + "1700000000" + "secret")
        let p = provider("1", "secret");
        assert_eq!(p.sign(1_700_000_000), "dc2e27b5f653df8382ed4ae6e3bca92b");
    }

    #[test]
    fn sign_changes_with_timestamp_and_key() {
        let p = provider("1", "secret");
        assert_ne!(p.sign(1_700_000_000), p.sign(1_700_000_001));
        assert_ne!(
            p.sign(1_700_000_000),
            provider("1", "other").sign(1_700_000_000)
        );
    }

    #[test]
    fn auth_fields_share_timestamp() {
        let p = provider("7", "k");
        let fields = p.auth_fields(42);
        assert_eq!(fields[0], ("uid", "7".to_string()));
        assert_eq!(fields[1], ("timestamp", "42".to_string()));
        assert_eq!(fields[2].1, p.sign(42));
        assert_eq!(fields[2].1.len(), 32);
    }
}
