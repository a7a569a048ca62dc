//! Channel scan demo
//!
//! Demonstrates the pca9546 crate on the Raspberry Pi Pico 2. Connects each
//! downstream channel of the switch in turn, probes every 7-bit address on
//! it and logs the devices that acknowledge, then disconnects everything.
//! Repeats every five seconds.
//!
//! # Wiring
//!
//! | Signal    | Pico 2 Pin | Notes                         |
//! |-----------|------------|-------------------------------|
//! | I2C0 SDA  | GP20       | Upstream side of the switch   |
//! | I2C0 SCL  | GP21       |                               |
//! | A0–A2     | GND        | Switch at 0x70                |

#![no_std]
#![no_main]

use defmt::*;
use embassy_embedded_hal::shared_bus::asynch::i2c::I2cDevice;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Timer};
use embedded_hal_async::i2c::I2c as _;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use pca9546::{AsyncPca9546, Channels, CHANNEL_COUNT, DEFAULT_ADDRESS};

/// Tell the Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = embassy_rp::block::ImageDef::secure_exe();

// Wire the I2C0 interrupt to Embassy's handler.
bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

/// Upstream bus, shared by the switch driver and the scanner.
static I2C_BUS: StaticCell<Mutex<CriticalSectionRawMutex, I2c<'static, I2C0, i2c::Async>>> =
    StaticCell::new();

type BusDevice = I2cDevice<'static, CriticalSectionRawMutex, I2c<'static, I2C0, i2c::Async>>;

/// First and last non-reserved 7-bit addresses.
const SCAN_FIRST: u8 = 0x08;
const SCAN_LAST: u8 = 0x77;

/// Probe every address on whatever branches are currently connected.
async fn scan(bus: &mut BusDevice, skip: u8) -> usize {
    let mut found = 0;
    let mut buf = [0u8; 1];
    for address in SCAN_FIRST..=SCAN_LAST {
        if address == skip {
            continue;
        }
        if bus.read(address, &mut buf).await.is_ok() {
            info!("  device at {=u8:#x}", address);
            found += 1;
        }
    }
    found
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());

    // --- I2C bus (GP20 = SDA, GP21 = SCL) ---
    let i2c = I2c::new_async(
        p.I2C0,
        p.PIN_21, // SCL
        p.PIN_20, // SDA
        Irqs,
        i2c::Config::default(),
    );
    let i2c_bus = I2C_BUS.init(Mutex::new(i2c));

    // Start with every branch detached so the first scan sees only the
    // upstream bus.
    let mut mux = AsyncPca9546::new(I2cDevice::new(i2c_bus), DEFAULT_ADDRESS, 0).await;
    if !mux.status().is_success() {
        error!("PCA9546 at {=u8:#x} did not respond", DEFAULT_ADDRESS);
    }
    let mut scanner = I2cDevice::new(i2c_bus);

    loop {
        info!("Upstream bus:");
        let upstream = scan(&mut scanner, DEFAULT_ADDRESS).await;
        info!("{} device(s) upstream", upstream);

        for index in 0..CHANNEL_COUNT as u8 {
            let Some(channel) = Channels::from_bits(1 << index) else {
                continue;
            };
            if mux.set_channels(channel).await.is_err() {
                warn!("Could not select channel {}", index + 1);
                continue;
            }

            info!("Channel {}:", index + 1);
            // Upstream devices answer on every channel; only new ones count.
            let found = scan(&mut scanner, DEFAULT_ADDRESS).await;
            info!("{} device(s) on channel {}", found.saturating_sub(upstream), index + 1);
        }

        if mux.disable_all().await.is_err() {
            warn!("Failed to disconnect channels");
        }

        Timer::after(Duration::from_secs(5)).await;
    }
}
