use std::str::FromStr;

use nalgebra::{Point3, Vector3};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum LogFormat {
    Compact,
    Full,
    Pretty,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Compact => f.write_str("compact"),
            LogFormat::Full => f.write_str("full"),
            LogFormat::Pretty => f.write_str("pretty"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

/// Which normal buffers to upload.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum Normals {
    Surface,
    Visualize,
}

impl std::fmt::Display for Normals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Normals::Surface => f.write_str("surface"),
            Normals::Visualize => f.write_str("visualize"),
        }
    }
}

impl From<Normals> for facet::NormalMode {
    fn from(n: Normals) -> Self {
        match n {
            Normals::Surface => Self::Surface,
            Normals::Visualize => Self::Visualize,
        }
    }
}

#[derive(Debug, clap::Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Logging output filters; comma-separated
    #[arg(
        short,
        long,
        default_value = "warn,facet=info,turntable=info",
        env = "TURNTABLE_LOG_FILTER"
    )]
    pub log_filter: String,
    /// Logging output format
    #[arg(long, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
    /// Edge length of the voxel
    #[arg(short, long, default_value_t = 1.0)]
    pub side: f32,
    /// Center of the voxel, in world space
    #[arg(short, long, default_value = "0,0,-6", value_parser = parse_vec3::<f32>, value_name = "X,Y,Z", allow_hyphen_values = true)]
    pub position: Vector3<f32>,
    /// Where silhouettes are seen from
    #[arg(long, default_value = "0,0,0", value_parser = parse_point3::<f32>, value_name = "X,Y,Z", allow_hyphen_values = true)]
    pub viewpoint: Point3<f32>,
    /// Number of animation frames to run
    #[arg(short, long, default_value_t = 90)]
    pub ticks: u32,
    /// Rotation per frame, in degrees about the voxel's local x and y axes
    #[arg(long, default_value = "2,3", value_parser = parse_vec2::<f32>, value_name = "X,Y", allow_hyphen_values = true)]
    pub spin: (f32, f32),
    /// Direction of a ray cast from the viewpoint every frame
    #[arg(short, long, default_value = "0,0,-1", value_parser = parse_vec3::<f32>, value_name = "X,Y,Z", allow_hyphen_values = true)]
    pub ray: Vector3<f32>,
    /// Normal buffers uploaded with the voxel
    #[arg(long, default_value_t = Normals::Surface)]
    pub normals: Normals,
    /// Canvas width, in pixels
    #[arg(long, default_value_t = 640)]
    pub width: u32,
    /// Canvas height, in pixels
    #[arg(long, default_value_t = 480)]
    pub height: u32,
}

type ParseError = Box<dyn std::error::Error + Send + Sync + 'static>;

fn parse_components<R: FromStr, const N: usize>(s: &str) -> Result<[R; N], ParseError>
where
    <R as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    let parts = s
        .trim()
        .split(',')
        .map(|p| R::from_str(p.trim()))
        .collect::<Result<Vec<_>, _>>()?;
    let len = parts.len();
    parts
        .try_into()
        .map_err(|_| format!("expected {N} comma-separated components, got {len}").into())
}

fn parse_vec3<R: FromStr + nalgebra::Scalar>(s: &str) -> Result<Vector3<R>, ParseError>
where
    <R as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    let [x, y, z] = parse_components::<R, 3>(s)?;
    Ok(nalgebra::vector![x, y, z])
}

fn parse_point3<R: FromStr + nalgebra::Scalar>(s: &str) -> Result<Point3<R>, ParseError>
where
    <R as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    parse_vec3::<R>(s).map(Point3::from)
}

fn parse_vec2<R: FromStr>(s: &str) -> Result<(R, R), ParseError>
where
    <R as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    let [x, y] = parse_components::<R, 2>(s)?;
    Ok((x, y))
}

/// Set up pretty log output
pub(crate) fn initialize_tracing(log_filter: &str, log_format: LogFormat) {
    let tsub = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::OffsetTime::new(
            time::UtcOffset::current_local_offset().unwrap_or_else(|e| {
                tracing::warn!("couldn't get local time offset: {:?}", e);
                time::UtcOffset::UTC
            }),
            time::macros::format_description!("[hour]:[minute]:[second]"),
        ))
        .with_env_filter(log_filter);

    match log_format {
        LogFormat::Compact => tsub.compact().init(),
        LogFormat::Full => tsub.init(),
        LogFormat::Pretty => tsub.pretty().init(),
        LogFormat::Json => tsub.json().init(),
    }
}
