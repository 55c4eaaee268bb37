use tileview::{
    animation::TimerSlot, core::share::format_walking_time, Direction, Location, LocationKey,
    ManualScheduler, MapInit, NavCommand, PathRecord, Point, RecordingRenderer, ShareLink, Size,
    ViewportBuilder,
};

/// Example of driving a viewport headlessly, firing timer ticks by hand
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    println!("🗺️ Tileview Headless Example");
    println!("============================");

    let mut init = MapInit::new(Size::new(640.0, 480.0));
    init.origin = Some(Location::new("Library", 1200.0, 900.0));
    init.destination = Some(Location::new("Gym", 2400.0, 1700.0));
    init.path = Some(PathRecord {
        origin: 3,
        destination: 7,
        x: 1200.0,
        y: 900.0,
        width: 1200.0,
        height: 800.0,
        distance: 0.62,
    });

    let mut viewport = ViewportBuilder::from_init(&init)
        .map_err(|e| anyhow::anyhow!(e))?
        .build(RecordingRenderer::new(), ManualScheduler::new())
        .map_err(|e| anyhow::anyhow!(e))?;

    let state = viewport.state();
    println!("✅ Viewport created:");
    println!("   Zoom: {}", state.zoom);
    println!("   Offset: ({}, {})", state.offset.x, state.offset.y);
    println!("   Tiles: {}", viewport.renderer().tiles.as_ref().map_or(0, |t| t.len()));

    println!("\n🚀 Pan button right:");
    viewport.handle(NavCommand::PanButton {
        direction: Direction::Right,
    });
    let mut ticks = 0;
    while let Some(handle) = viewport.scheduler().active(TimerSlot::Scroll) {
        viewport.tick(handle);
        ticks += 1;
    }
    println!("   {} ticks, offset now ({}, {})", ticks, viewport.offset().x, viewport.offset().y);

    println!("\n🔍 Zoom operations:");
    for command in [NavCommand::ZoomOut, NavCommand::ZoomOut, NavCommand::ZoomIn] {
        viewport.handle(command.clone());
        println!("   {:?} -> zoom {}", command, viewport.zoom_index());
    }

    println!("\n📍 Slide to origin:");
    viewport.slide_to_location(LocationKey::Origin);
    while let Some(handle) = viewport.scheduler().active(TimerSlot::Scroll) {
        viewport.tick(handle);
    }
    let center = viewport.state().center;
    println!("   Centered on ({}, {})", center.x, center.y);

    println!("\n🖱️ Drag by (-100, -50):");
    viewport.handle(NavCommand::DragStart {
        pointer: Point::new(300.0, 200.0),
    });
    viewport.handle(NavCommand::DragMove {
        pointer: Point::new(200.0, 150.0),
    });
    viewport.handle(NavCommand::DragEnd);
    println!("   Offset now ({}, {})", viewport.offset().x, viewport.offset().y);

    if let Some(path) = viewport.path() {
        let link = ShareLink::new("Library", "Gym");
        let walk = path.walking_time(link.minutes_per_mile as f64);
        println!("\n🚶 Walking time: {}", format_walking_time(walk));
        let url = link
            .to_url(&viewport.config().assets.share_base_url, &viewport.state())
            .map_err(|e| anyhow::anyhow!(e))?;
        println!("🔗 Share link: {}", url);
    }

    println!(
        "\n📊 Renderer saw {} moves, {} tile loads, {} overlay renders",
        viewport.renderer().moves,
        viewport.renderer().tile_loads,
        viewport.renderer().overlay_renders
    );

    Ok(())
}
