use offsite_core::{ConfigWriter, Error};
use offsite_fs::NormalizedPath;
use offsite_meta::{Endpoint, Secret, ShareEndpoint};
use offsite_test_utils::{EngineCall, FakeEngine, object_endpoint, registry, share_endpoint};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn share_with_domain() -> ShareEndpoint {
    ShareEndpoint {
        domain: Some("WORKGROUP".into()),
        ..share_endpoint("nas")
    }
}

#[tokio::test]
async fn test_plain_share_emits_one_section() {
    let engine = FakeEngine::new();
    let registry = registry([Endpoint::Share(share_with_domain())]);

    let text = ConfigWriter::new(&engine).render(&registry).await.unwrap();
    assert_eq!(
        text,
        "[nas]\n\
         type = smb\n\
         host = 192.168.1.2\n\
         user = backup\n\
         pass = obscured:share-pass\n\
         domain = WORKGROUP\n\
         \n"
    );
}

#[tokio::test]
async fn test_encrypted_share_emits_raw_and_crypt_sections() {
    let engine = FakeEngine::new();
    let registry = registry([Endpoint::Share(ShareEndpoint {
        encrypt_key: Some(Secret::new("enc-key")),
        ..share_with_domain()
    })]);

    let text = ConfigWriter::new(&engine).render(&registry).await.unwrap();
    assert_eq!(
        text,
        "[nas-raw]\n\
         type = smb\n\
         host = 192.168.1.2\n\
         user = backup\n\
         pass = obscured:share-pass\n\
         domain = WORKGROUP\n\
         \n\
         [nas]\n\
         type = crypt\n\
         remote = nas-raw:\n\
         password = obscured:enc-key\n\
         directory_name_encryption = false\n\
         \n"
    );
}

#[tokio::test]
async fn test_object_key_is_not_obscured() {
    let engine = FakeEngine::new();
    let registry = registry([
        Endpoint::Object(object_endpoint("b2")),
        Endpoint::Share(share_endpoint("nas")),
    ]);

    let text = ConfigWriter::new(&engine).render(&registry).await.unwrap();
    assert!(text.starts_with("[b2]\ntype = b2\naccount = key-id\nkey = app-key\n\n[nas]\n"));
    assert_eq!(
        engine.calls(),
        vec![EngineCall::Obscure("share-pass".into())]
    );
}

#[tokio::test]
async fn test_missing_host_fails_before_writing() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("rclone.conf"));
    let engine = FakeEngine::new();
    let registry = registry([Endpoint::Share(ShareEndpoint {
        host: String::new(),
        ..share_endpoint("nas")
    })]);

    let err = ConfigWriter::new(&engine)
        .write(&registry, &path)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidRemote { ref name, .. } if name == "nas"));
    assert!(!path.exists());
}

#[tokio::test]
async fn test_write_creates_parents_and_overwrites() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("nested/dir/rclone.conf"));
    let engine = FakeEngine::new();
    let writer = ConfigWriter::new(&engine);

    std::fs::create_dir_all(temp.path().join("nested/dir")).unwrap();
    std::fs::write(path.to_native(), "stale content that is longer than the new config\n".repeat(20))
        .unwrap();

    let registry = registry([Endpoint::Object(object_endpoint("b2"))]);
    writer.write(&registry, &path).await.unwrap();
    writer.write(&registry, &path).await.unwrap();

    let written = std::fs::read_to_string(path.to_native()).unwrap();
    assert_eq!(written, "[b2]\ntype = b2\naccount = key-id\nkey = app-key\n\n");
}

#[tokio::test]
async fn test_new_file_in_missing_directory() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("a/b/c/rclone.conf"));
    let engine = FakeEngine::new();

    ConfigWriter::new(&engine)
        .write(&registry([Endpoint::Object(object_endpoint("b2"))]), &path)
        .await
        .unwrap();
    assert!(path.exists());
}
