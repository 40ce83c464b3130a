pub struct Spiralens {}

static SPIRALENS_STATIC: std::sync::OnceLock<SpiralensStatic> = std::sync::OnceLock::new();

struct SpiralensStatic {}

impl SpiralensStatic {
    fn init(_app_name: &str) -> &'static Self {
        SPIRALENS_STATIC.get_or_init(|| {
            env_logger::builder()
                .filter_level(log::LevelFilter::Info)
                .parse_default_env()
                .init();

            Self {}
        })
    }
}

impl Spiralens {
    /// Initialize process-wide state (logging); safe to call more than once.
    pub fn new(app_name: &str) -> Self {
        SpiralensStatic::init(app_name);

        Self {}
    }
}
