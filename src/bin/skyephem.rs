//! Ephemeris publisher and viewer
//!
//! Runs the ephemeris engine for the observer described in a RON configuration file and
//! either publishes the record into a shared region or prints it.
//!
//! Usage:
//! ```bash
//! # Publish into the shared region once per update interval, forever
//! skyephem --config skyephem.ron publish
//!
//! # Publish ten updates, one simulated minute apart
//! skyephem publish --ticks 10 --step 60
//!
//! # Print what a publisher wrote
//! skyephem show
//!
//! # One-off computation for the configured observer, with stars above the horizon
//! skyephem now --stars
//! ```

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::{Parser, Subcommand};
use log::info;

use skyephem::{
    bodies::CelestialBodyName,
    config::SkyConfig,
    constants::RADEG,
    engine::{EphemerisEngine, UpdateCallback},
    ephemeris_data::EphemerisData,
    lighting::scene_lights,
    shmem::{EphemerisReader, EphemerisWriter},
    sky_color::{to_rgb8, SkyColorModel},
    sky_errors::SkyError,
    stars::StarField,
    time::day_to_epoch,
};

#[derive(Parser, Debug)]
#[command(
    name = "skyephem",
    about = "Sun, Moon and planet positions for an observer on the Earth",
    long_about = None
)]
struct Args {
    /// RON configuration file, defaults are used when it does not exist
    #[arg(short, long, default_value = "skyephem.ron")]
    config: PathBuf,

    /// Shared region file, overrides the configured one
    #[arg(short, long)]
    region: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Update the shared region in a loop
    Publish {
        /// Stop after this many updates (runs forever when absent)
        #[arg(short, long)]
        ticks: Option<u64>,

        /// Simulated seconds added before each update, overrides the configured step
        #[arg(short, long)]
        step: Option<i64>,
    },
    /// Print the record currently held by the shared region
    Show,
    /// Compute and print the sky for the configured observer
    Now {
        /// Also list the stars above the horizon
        #[arg(long, default_value_t = false)]
        stars: bool,
    },
}

fn main() -> Result<(), SkyError> {
    let args = Args::parse();
    let mut config = SkyConfig::load_or_default(&args.config)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    if let Some(region) = args.region {
        config.shared_region.path = Some(region);
    }

    match args.command {
        Command::Publish { ticks, step } => publish(&config, ticks, step),
        Command::Show => show(&config),
        Command::Now { stars } => now(&config, stars),
    }
}

fn publish(config: &SkyConfig, ticks: Option<u64>, step: Option<i64>) -> Result<(), SkyError> {
    let writer = EphemerisWriter::attach(config.shared_region.resolved_path())?;
    let mut engine = EphemerisEngine::new(writer);
    engine.configure(config);

    let auto_advance = config.time.auto_advance;
    let step = step.unwrap_or(config.time.time_step_seconds);
    if !auto_advance && step != 0 {
        let time_passes: UpdateCallback =
            Box::new(move |data: &mut EphemerisData| data.date_time.add_seconds(step));
        engine.set_update_callback(Some(time_passes));
    }

    let interval = Duration::from_millis(config.time.update_interval_ms);
    info!(
        "Publishing every {} ms (auto advance: {auto_advance}, step: {step} s)",
        config.time.update_interval_ms
    );

    let mut count = 0u64;
    loop {
        engine.update(auto_advance);
        if let Some(writer) = engine.store() {
            writer.flush()?;
        }
        count += 1;
        if ticks.is_some_and(|t| count >= t) {
            break;
        }
        thread::sleep(interval);
    }

    if let Some(data) = engine.ephemeris_data() {
        print_record(data);
    }
    info!("Published {count} updates");
    Ok(())
}

fn show(config: &SkyConfig) -> Result<(), SkyError> {
    let reader = EphemerisReader::attach(config.shared_region.resolved_path())?;
    print_record(&reader.snapshot());
    Ok(())
}

fn now(config: &SkyConfig, with_stars: bool) -> Result<(), SkyError> {
    let mut engine = EphemerisEngine::default();
    engine.configure(config);
    engine.update(false);

    let Some(data) = engine.ephemeris_data() else {
        return Ok(());
    };
    print_record(data);

    println!();
    println!(
        "Moon illuminated: {:.1}%",
        engine.moon_illuminated_fraction() * 100.0
    );

    let sun = data.body(CelestialBodyName::Sun);
    let mut sky = SkyColorModel::new(data.turbidity);
    sky.set_sun_position(sun.azimuth / RADEG, sun.altitude / RADEG);
    let [r, g, b] = to_rgb8(sky.color(90.0 * RADEG, 0.0));
    println!("Zenith color: #{r:02x}{g:02x}{b:02x}");

    let (sun_light, moon_light) = scene_lights(data);
    println!(
        "Sun light diffuse: ({:.3}, {:.3}, {:.3})",
        sun_light.diffuse.x, sun_light.diffuse.y, sun_light.diffuse.z
    );
    println!(
        "Moon light diffuse: ({:.3}, {:.3}, {:.3})",
        moon_light.diffuse.x, moon_light.diffuse.y, moon_light.diffuse.z
    );

    if with_stars {
        let field = match &config.star_catalog {
            Some(path) => StarField::from_file_or_default(path),
            None => StarField::bright_stars(),
        };
        println!();
        println!("Stars (alpha {:.2}):", field.alpha(data));
        for placed in field.visible(data) {
            println!(
                "  {:<16} mag {:>5.2}  az {:>7.2}  alt {:>6.2}",
                placed.star.name,
                placed.star.magnitude,
                placed.azimuth / RADEG,
                placed.altitude / RADEG
            );
        }
    }
    Ok(())
}

fn print_record(data: &EphemerisData) {
    println!(
        "{} | lat {:.4} lon {:.4} alt {:.1} m | day {:.5} | LST {:.4} h",
        data.date_time,
        data.latitude,
        data.longitude,
        data.altitude,
        data.modified_julian_date,
        data.local_sidereal_time
    );
    println!("UTC {}", day_to_epoch(data.modified_julian_date));
    println!(
        "{:<8} {:>9} {:>9} {:>6} {:>9} {:>8}",
        "Body", "RA", "Dec", "Mag", "Az", "Alt"
    );
    for (_, body) in data.bodies() {
        println!(
            "{:<8} {:>9.4} {:>9.4} {:>6.2} {:>9.4} {:>8.4}",
            body.name(),
            body.right_ascension / RADEG,
            body.declination / RADEG,
            body.magnitude,
            body.azimuth / RADEG,
            body.altitude / RADEG
        );
    }
}
