use common::ColorLaw;
use log::{debug, info};

use crate::{
    config::Config,
    error::Result,
    packet::{Packetizer, UploadStats},
    strip::FrameBuffer,
    transport::Transport,
};

/// Everything needed to put one strip on the wire: the frame buffer, the
/// packet layout, the colour law and the transport.
pub struct LedController<T: Transport> {
    strip: FrameBuffer,
    packetizer: Packetizer,
    color_law: ColorLaw,
    transport: T,
}

impl<T: Transport> LedController<T> {
    pub fn new(transport: T, led_count: usize, max_bytes: usize) -> Result<Self> {
        let mut controller = LedController {
            strip: FrameBuffer::default(),
            packetizer: Packetizer::new(max_bytes)?,
            color_law: ColorLaw::default(),
            transport,
        };
        controller.setup(led_count)?;
        Ok(controller)
    }

    /// Build a controller from the loaded configuration and point the
    /// transport at the configured endpoint.
    pub fn from_config(config: &Config, mut transport: T) -> anyhow::Result<Self> {
        transport.reset_endpoint(&config.address, config.port)?;

        let mut controller = LedController::new(transport, config.led_count, config.max_bytes)?;
        controller.set_brightness(config.brightness);
        controller.set_color_law(config.color_law);

        info!(
            "Controller: {} LEDs at {}:{}, {} packets per frame",
            config.led_count,
            config.address,
            config.port,
            controller.total_packets()
        );

        Ok(controller)
    }

    /// Reset the strip to `count` default LEDs.
    pub fn setup(&mut self, count: usize) -> Result<()> {
        self.packetizer.setup(count)?;
        self.strip.setup(count);
        Ok(())
    }

    /// Change the strip length, keeping the colours of the LEDs that remain.
    pub fn resize(&mut self, count: usize) -> Result<()> {
        self.packetizer.setup(count)?;
        self.strip.resize(count);
        Ok(())
    }

    pub fn strip(&self) -> &FrameBuffer {
        &self.strip
    }

    pub fn strip_mut(&mut self) -> &mut FrameBuffer {
        &mut self.strip
    }

    pub fn set_brightness(&mut self, brightness: u8) {
        self.strip.set_brightness(brightness);
    }

    pub fn brightness(&self) -> u8 {
        self.strip.brightness()
    }

    pub fn set_color_law(&mut self, color_law: ColorLaw) {
        debug!("Controller: colour law set to {:?}", color_law);
        self.color_law = color_law;
    }

    pub fn color_law(&self) -> ColorLaw {
        self.color_law
    }

    pub fn total_packets(&self) -> u8 {
        self.packetizer.total_packets()
    }

    pub fn packetizer(&self) -> &Packetizer {
        &self.packetizer
    }

    /// Send the current frame.
    pub fn upload(&mut self) -> Result<UploadStats> {
        let color_law = self.color_law;
        self.packetizer.upload(
            self.strip.as_slice(),
            self.strip.brightness(),
            |hsv| color_law.to_rgb(hsv),
            &mut self.transport,
        )
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
