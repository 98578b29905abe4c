use super::*;

fn any_installed_font() -> Option<ResolvedFont> {
    FontResolver::new().load(&FontSource::AnyInstalled).ok()
}

#[test]
fn default_chain_orders_requested_path_first() {
    let chain = default_chain(Some(Path::new("fonts/Custom.ttf")));
    assert_eq!(
        chain,
        vec![
            FontSource::Path(PathBuf::from("fonts/Custom.ttf")),
            FontSource::DefaultFamily,
            FontSource::AnyInstalled,
        ]
    );
    assert_eq!(
        default_chain(None),
        vec![FontSource::DefaultFamily, FontSource::AnyInstalled]
    );
}

#[test]
fn missing_font_path_is_font_unavailable() {
    let err = FontResolver::new()
        .load(&FontSource::Path(PathBuf::from(
            "target/this_font_does_not_exist.ttf",
        )))
        .unwrap_err();
    assert!(matches!(err, CaptionError::FontUnavailable(_)));
}

#[test]
fn non_font_file_is_font_unavailable() {
    let err = FontResolver::new()
        .load(&FontSource::Path(PathBuf::from("Cargo.toml")))
        .unwrap_err();
    assert!(matches!(err, CaptionError::FontUnavailable(_)));
}

#[test]
fn empty_or_exhausted_chain_resolves_nothing() {
    let mut resolver = FontResolver::new();
    assert!(resolve_font(&mut resolver, &[]).is_none());
    assert!(
        resolve_font(
            &mut resolver,
            &[FontSource::Path(PathBuf::from("target/nope.otf"))]
        )
        .is_none()
    );
}

#[test]
fn bad_path_falls_through_to_installed_font() {
    if any_installed_font().is_none() {
        eprintln!("skipping: no fonts installed");
        return;
    }
    let chain = [
        FontSource::Path(PathBuf::from("target/this_font_does_not_exist.ttf")),
        FontSource::AnyInstalled,
    ];
    let font = resolve_font(&mut FontResolver::new(), &chain).expect("fallback font");
    assert_eq!(font.source, FontSource::AnyInstalled);
    assert!(!font.data.is_empty());
}

#[test]
fn explicit_path_to_installed_font_wins() {
    // Re-resolve an installed font through its file path to exercise the path strategy.
    let db = {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        db
    };
    let Some(path) = db.faces().find_map(|f| match &f.source {
        fontdb::Source::File(p) if f.index == 0 => Some(p.clone()),
        _ => None,
    }) else {
        eprintln!("skipping: no font files installed");
        return;
    };

    let chain = default_chain(Some(&path));
    let font = resolve_font(&mut FontResolver::new(), &chain).expect("font");
    assert_eq!(font.source, FontSource::Path(path));
    assert_eq!(font.index, 0);
}
