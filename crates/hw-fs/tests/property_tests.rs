use hw_fs::{Fingerprint, NormalizedPath};
use proptest::prelude::*;

proptest! {
    #[test]
    fn normalization_invariants(s in "\\PC*") {
        let path = NormalizedPath::new(&s);
        let as_str = path.as_str();

        prop_assert!(!as_str.contains('\\'));
        prop_assert!(!as_str.contains("//"));
        prop_assert!(as_str == "/" || !as_str.ends_with('/'));

        // Normalizing twice changes nothing
        let again = NormalizedPath::new(path.to_native());
        prop_assert_eq!(path, again);
    }

    #[test]
    fn joined_path_is_within_its_base(a in "[a-z]{1,8}(/[a-z]{1,8}){0,3}", b in "[a-z]{1,8}\\.jpg") {
        let base = NormalizedPath::new(&a);
        let joined = base.join(&b);

        prop_assert!(joined.is_within(&base));
        let relative = joined.relative_to(&base).unwrap();
        prop_assert_eq!(relative.as_str(), b.as_str());
        prop_assert_eq!(joined.parent().unwrap(), base);
    }

    #[test]
    fn fingerprint_depends_only_on_content(content in proptest::collection::vec(any::<u8>(), 0..4096)) {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a/x.jpg");
        let second = dir.path().join("b/y.jpg");
        std::fs::create_dir_all(first.parent().unwrap()).unwrap();
        std::fs::create_dir_all(second.parent().unwrap()).unwrap();
        std::fs::write(&first, &content).unwrap();
        std::fs::write(&second, &content).unwrap();

        let a = hw_fs::fingerprint_file(&first).unwrap();
        let b = hw_fs::fingerprint_file(&second).unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a, Fingerprint::of_bytes(&content));
    }
}
