use tileview::prelude::*;

/// Tests for the startup path and for links that reproduce a view
#[cfg(test)]
mod init_and_share {
    use super::*;

    const PAGE_INIT: &str = r#"{
        "container": { "width": 500, "height": 375 },
        "base_maps": [
            { "name": "campus", "width": 7200, "height": 6600, "scales": [1.0, 0.5, 0.25, 0.125] }
        ],
        "locations": [
            { "id": 12, "name": "Main Library", "x": 1800, "y": 2200 },
            { "id": 31, "name": "Rec Center", "x": 2600, "y": 2700 }
        ],
        "origin": { "name": "Main Library", "x": 1800, "y": 2200 },
        "destination": { "name": "Rec Center", "x": 2600, "y": 2700 },
        "path": {
            "origin": 31, "destination": 12,
            "x": 1800, "y": 2200, "width": 800, "height": 500,
            "distance": 0.75
        }
    }"#;

    /// Tile source for a CDN layout
    struct CdnSource;

    impl TileSource for CdnSource {
        fn tile_path(&self, map_name: &str, zoom: usize, row: u32, col: u32) -> String {
            format!("https://cdn.example.org/{map_name}/{zoom}/{row}/{col}.png")
        }

        fn path_image(&self, origin: usize, destination: usize, zoom: usize) -> String {
            format!("https://cdn.example.org/routes/{origin}-{destination}/{zoom}.png")
        }
    }

    fn build(init: &MapInit) -> Viewport<RecordingRenderer, ManualScheduler> {
        ViewportBuilder::from_init(init)
            .unwrap()
            .build(RecordingRenderer::new(), ManualScheduler::new())
            .unwrap()
    }

    #[test]
    fn test_page_init_fits_route() {
        let init = MapInit::from_json(PAGE_INIT).unwrap();
        let viewport = build(&init);

        // 800x500 only fits 495x370 from scale 0.5 on
        assert_eq!(viewport.zoom_index(), 1);
        assert_eq!(viewport.state().center, Point::new(2200.0, 2450.0));
        assert_eq!(viewport.locations().len(), 4);

        let frame = viewport.renderer().overlays.as_ref().unwrap();
        let path = frame.path.as_ref().unwrap();
        assert_eq!((path.left, path.top, path.width, path.height), (900, 1100, 400, 250));
        assert_eq!(path.src, "/p/im-12-31-1.png");

        let tiles = viewport.renderer().tiles.as_ref().unwrap();
        assert!(tiles
            .tiles
            .iter()
            .all(|tile| tile.src.starts_with("/static/tiles/campus-1[")));
    }

    #[test]
    fn test_custom_tile_source() {
        let init = MapInit::from_json(PAGE_INIT).unwrap();
        let viewport = ViewportBuilder::from_init(&init)
            .unwrap()
            .with_tile_source(Box::new(CdnSource))
            .build(RecordingRenderer::new(), ManualScheduler::new())
            .unwrap();

        let preloaded: Vec<&str> = viewport
            .renderer()
            .preloaded
            .iter()
            .map(|image| image.src.as_str())
            .collect();
        assert_eq!(preloaded.len(), 4);
        assert_eq!(preloaded[3], "https://cdn.example.org/routes/31-12/3.png");
        assert_eq!(viewport.renderer().preloaded[3].width, 100.0);
    }

    #[test]
    fn test_explicit_view_wins_over_route() {
        let mut init = MapInit::from_json(PAGE_INIT).unwrap();
        init.center = Some(Point::new(6000.0, 6000.0));
        init.zoom = Some(9);
        let viewport = build(&init);

        assert_eq!(viewport.zoom_index(), 3);
        // clamped to the bottom-right corner of the 900x825 level
        assert_eq!(viewport.offset(), Point::new(400.0, 450.0));
    }

    #[test]
    fn test_invalid_init_is_fatal() {
        let err = MapInit::from_json(
            r#"{ "container": { "width": 500, "height": -1 },
                 "base_maps": [{ "name": "m", "width": 10, "height": 10, "scales": [1.0] }] }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("container"));

        let mut init = MapInit::from_json(PAGE_INIT).unwrap();
        init.base_map = Some("aerial".to_string());
        assert!(ViewportBuilder::from_init(&init).is_err());
    }

    #[test]
    fn test_share_link_round_trip_restores_view() {
        let init = MapInit::from_json(PAGE_INIT).unwrap();
        let mut viewport = build(&init);
        viewport.pan(37.0, -12.0);

        let link = ShareLink::new("Main Library", "Rec Center").with_minutes_per_mile(22);
        let url = link
            .to_url(&viewport.config().assets.share_base_url, &viewport.state())
            .unwrap();
        assert!(url.as_str().starts_with("http://localhost/map?from=Main+Library&to=Rec+Center"));

        let shared = ShareLink::parse(url.as_str()).unwrap();
        assert_eq!(shared.link, link);

        let mut restored_init = init.clone();
        restored_init.center = shared.center;
        restored_init.zoom = shared.zoom;
        let restored = build(&restored_init);

        assert_eq!(restored.zoom_index(), viewport.zoom_index());
        assert_eq!(restored.state().center, viewport.state().center);
    }

    #[test]
    fn test_walking_time() {
        let init = MapInit::from_json(PAGE_INIT).unwrap();
        let viewport = build(&init);
        let path = viewport.path().unwrap();

        assert_eq!(format_walking_time(path.walking_time(20.0)), "15:00");
        assert_eq!(format_walking_time(path.walking_time(17.0)), "12:45");
    }
}
