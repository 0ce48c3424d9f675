use std::collections::HashSet;

use hw_core::{AutoApprove, Catalog, Fingerprint, Reconciler};
use hw_test_utils::TestGallery;
use proptest::prelude::*;

const PATHS: [&str; 5] = ["a.jpg", "b.jpg", "d/c.jpg", "d/e/f.jpg", "z/a.jpg"];
const CONTENTS: [&str; 3] = ["X", "Y", "Z"];

fn layout() -> impl Strategy<Value = Vec<Option<usize>>> {
    proptest::collection::vec(proptest::option::of(0..CONTENTS.len()), PATHS.len())
}

fn apply_layout(gallery: &TestGallery, layout: &[Option<usize>]) {
    for (path, content) in PATHS.iter().zip(layout) {
        let absolute = gallery.path(path);
        match content {
            Some(index) => {
                gallery.write(path, CONTENTS[*index]);
            }
            None if absolute.exists() => {
                gallery.remove(path);
            }
            None => {}
        }
    }
}

fn assert_converged(catalog: &Catalog, gallery: &TestGallery, layout: &[Option<usize>]) {
    let fingerprints: HashSet<&Fingerprint> = catalog.entities().map(|e| e.fingerprint()).collect();
    assert_eq!(fingerprints.len(), catalog.len(), "two entities share content");

    for entity in catalog.entities() {
        let on_disk = hw_fs::fingerprint_file(&entity.absolute_path(gallery.root())).unwrap();
        assert_eq!(&on_disk, entity.fingerprint());
    }

    let distinct: HashSet<usize> = layout.iter().flatten().copied().collect();
    assert_eq!(catalog.len(), distinct.len());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn sync_converges_without_duplicate_content(before in layout(), after in layout()) {
        let gallery = TestGallery::new();
        let mut catalog =
            Catalog::new(gallery.root(), vec![".*".into()], vec![r"\.jpg$".into()]).unwrap();
        let reconciler = Reconciler::default();

        apply_layout(&gallery, &before);
        reconciler.sync(&mut catalog, None, &mut AutoApprove).unwrap();
        assert_converged(&catalog, &gallery, &before);

        apply_layout(&gallery, &after);
        let report = reconciler.sync(&mut catalog, None, &mut AutoApprove).unwrap();
        prop_assert!(report.warnings.is_empty(), "{:?}", report.warnings);
        assert_converged(&catalog, &gallery, &after);

        let report = reconciler.sync(&mut catalog, None, &mut AutoApprove).unwrap();
        prop_assert!(report.is_clean());
    }
}
