//! High-level device interface

use std::fmt;

use huskylens_core::{
    constants::{HEADER_V2, V2_KNOCK_REPLY_SIZE},
    decode, request, AlgorithmSwitch, LinkState, ProtocolVersion, Session, V1Command,
    V2Command,
};
use huskylens_transport::{serial, ByteStream, I2cBus, I2cTransport, StreamTransport, Transport};
use huskylens_types::{Algorithm, Arrow, Block, Color, ResultQuery, ResultSet};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    error::{Error, Result},
    link::Link,
};

/// Number of algorithms a V2 multi-algorithm request accepts
const MULTI_ALGORITHM_RANGE: std::ops::RangeInclusive<usize> = 2..=5;

/// How to reach the device
pub enum Connection {
    /// I2C bus; the device address decides the protocol version
    I2c(Box<dyn I2cBus>),

    /// Serial port at the given baud rate
    Serial { path: String, baud_rate: u32 },

    /// Any byte stream carrying the serial protocol
    Stream(Box<dyn ByteStream>),
}

impl Connection {
    /// Serial port at the stock firmware's baud rate
    pub fn serial(path: impl Into<String>) -> Self {
        Self::Serial {
            path: path.into(),
            baud_rate: serial::DEFAULT_BAUD_RATE,
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I2c(_) => f.write_str("Connection::I2c"),
            Self::Serial { path, baud_rate } => {
                write!(f, "Connection::Serial({} @ {})", path, baud_rate)
            }
            Self::Stream(_) => f.write_str("Connection::Stream"),
        }
    }
}

/// HuskyLens vision sensor
///
/// Operations never fail: problems on the wire are logged and reported as
/// `false`, `None` or an empty [`ResultSet`].
///
/// # Examples
///
/// ```no_run
/// use huskylens::{Algorithm, Connection, HuskyLens, ResultQuery};
///
/// #[tokio::main]
/// async fn main() -> huskylens::Result<()> {
///     let mut lens = HuskyLens::connect(Connection::serial("/dev/ttyUSB0")).await?;
///
///     if lens.set_algorithm(Some(Algorithm::FaceRecognition)).await {
///         let results = lens.get_results(&ResultQuery::new()).await;
///         for block in &results.blocks {
///             println!("{}", block);
///         }
///     }
///     Ok(())
/// }
/// ```
pub struct HuskyLens {
    link: Link,
    session: Session,
}

impl HuskyLens {
    /// Connect with default configuration
    pub async fn connect(connection: Connection) -> Result<Self> {
        Self::connect_with(connection, Config::default()).await
    }

    /// Connect and detect the protocol version
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The serial device cannot be opened
    /// - No device answers on the I2C bus
    pub async fn connect_with(connection: Connection, config: Config) -> Result<Self> {
        match connection {
            Connection::I2c(bus) => {
                let (transport, version) = I2cTransport::detect(bus).await?;
                Ok(Self::with_version(Box::new(transport), version, config))
            }
            Connection::Serial { path, baud_rate } => {
                let transport = serial::open(&path, baud_rate)?;
                Ok(Self::with_transport(Box::new(transport), config).await)
            }
            Connection::Stream(stream) => {
                let transport = StreamTransport::new(stream, "stream");
                Ok(Self::with_transport(Box::new(transport), config).await)
            }
        }
    }

    /// Wrap a transport, probing V2 then V1
    ///
    /// If neither answers the version stays unknown and every operation
    /// reports failure.
    pub async fn with_transport(transport: Box<dyn Transport>, config: Config) -> Self {
        let mut lens = Self {
            link: Link::new(transport, config),
            session: Session::new(),
        };

        for version in [ProtocolVersion::V2, ProtocolVersion::V1] {
            if lens.knock_as(version).await {
                if let Err(e) = lens.session.set_version(version) {
                    debug!("Version already set: {}", e);
                }
                lens.session.record_knock(true);
                info!("HuskyLens {} on {}", version, lens.link.describe());
                return lens;
            }
        }

        warn!("No HuskyLens answered on {}", lens.link.describe());
        lens.session.record_knock(false);
        lens
    }

    /// Wrap a transport for a device of known version (no probing)
    pub fn with_version(
        transport: Box<dyn Transport>,
        version: ProtocolVersion,
        config: Config,
    ) -> Self {
        Self {
            link: Link::new(transport, config),
            session: Session::with_version(version),
        }
    }

    /// Detected protocol version
    pub fn version(&self) -> Option<ProtocolVersion> {
        self.session.version()
    }

    /// Check if the last knock succeeded
    pub fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    pub fn link_state(&self) -> LinkState {
        self.session.state()
    }

    /// Algorithm the device was last switched to
    pub fn current_algorithm(&self) -> Algorithm {
        self.session.algorithm()
    }

    /// Check that the device answers
    pub async fn knock(&mut self) -> bool {
        let Some(version) = self.session.version() else {
            debug!("Knock skipped: {}", Error::VersionUnknown);
            self.session.record_knock(false);
            return false;
        };

        let acknowledged = self.knock_as(version).await;
        self.session.record_knock(acknowledged);
        acknowledged
    }

    /// Switch the active algorithm
    ///
    /// `None` re-applies the current algorithm. On V2, requesting the active
    /// algorithm sends nothing.
    pub async fn set_algorithm(&mut self, algorithm: Option<Algorithm>) -> bool {
        let requested = algorithm.unwrap_or(self.session.algorithm());

        if self.session.plan_switch(requested) == AlgorithmSwitch::Unchanged {
            return true;
        }

        let sent = match self.session.version() {
            Some(ProtocolVersion::V1) => {
                let payload = request::v1_algorithm(requested);
                self.link.send_v1(V1Command::RequestAlgorithm, &payload).await
            }
            Some(ProtocolVersion::V2) => {
                let content = request::v2_algorithm(requested);
                self.link.send_v2(V2Command::SetAlgorithm, 0, &content).await
            }
            None => Err(Error::VersionUnknown),
        };

        if !self.confirm("Algorithm switch", sent).await {
            return false;
        }

        self.session.commit_algorithm(requested);
        info!("Switched to {}", requested);
        true
    }

    /// Run several algorithms at once (V2 only, two to five of them)
    pub async fn set_multi_algorithm(&mut self, algorithms: &[Algorithm]) -> bool {
        if self.session.version() != Some(ProtocolVersion::V2) {
            debug!("Multi-algorithm is V2 only");
            return false;
        }
        if !MULTI_ALGORITHM_RANGE.contains(&algorithms.len()) {
            debug!(
                "Multi-algorithm needs 2 to 5 algorithms, got {}",
                algorithms.len()
            );
            return false;
        }

        let content = request::v2_multi_algorithm(algorithms);
        let sent = self
            .link
            .send_v2(V2Command::SetMultiAlgorithm, 0, &content)
            .await;
        self.confirm("Multi-algorithm", sent).await
    }

    /// Request detection results
    ///
    /// Result frames that fail to read or decode are skipped; the rest is
    /// filtered by the query. Only a failed request or info frame empties
    /// the set.
    pub async fn get_results(&mut self, query: &ResultQuery) -> ResultSet {
        let outcome = match self.session.version() {
            Some(ProtocolVersion::V1) => self.collect_v1(query).await,
            Some(ProtocolVersion::V2) => {
                let algorithm = query.algorithm.unwrap_or(self.session.algorithm());
                let outcome = self.collect_v2(algorithm).await;
                self.link.flush().await;
                outcome
            }
            None => Err(Error::VersionUnknown),
        };

        match outcome {
            Ok(mut results) => {
                results.retain(query);
                results
            }
            Err(e) => {
                debug!("Result query failed: {}", e);
                ResultSet::new()
            }
        }
    }

    /// Request detection results and keep the blocks
    pub async fn get_blocks(&mut self, query: &ResultQuery) -> Vec<Block> {
        self.get_results(query).await.blocks
    }

    /// Request detection results and keep the arrows
    pub async fn get_arrows(&mut self, query: &ResultQuery) -> Vec<Arrow> {
        self.get_results(query).await.arrows
    }

    /// Show text on the device screen
    ///
    /// V1 ignores `color` and needs `y` within `0..=255`.
    pub async fn draw_text(&mut self, text: &str, x: i16, y: i16, color: Color) -> bool {
        let sent = match self.session.version() {
            Some(ProtocolVersion::V1) => match request::v1_text(text, x, y) {
                Ok(payload) => self.link.send_v1(V1Command::RequestCustomText, &payload).await,
                Err(e) => Err(e.into()),
            },
            Some(ProtocolVersion::V2) => match request::v2_text(text, x, y, color) {
                Ok(content) => self.link.send_v2(V2Command::DrawText, 0, &content).await,
                Err(e) => Err(e.into()),
            },
            None => Err(Error::VersionUnknown),
        };
        self.confirm("Draw text", sent).await
    }

    /// Remove all text from the device screen
    pub async fn clear_text(&mut self) -> bool {
        let sent = match self.session.version() {
            Some(ProtocolVersion::V1) => self.link.send_v1(V1Command::RequestClearText, &[]).await,
            Some(ProtocolVersion::V2) => self.link.send_v2(V2Command::ClearText, 0, &[]).await,
            None => Err(Error::VersionUnknown),
        };
        self.confirm("Clear text", sent).await
    }

    /// Draw a rectangle on the device screen (V2 only)
    pub async fn draw_rect(&mut self, x1: i16, y1: i16, x2: i16, y2: i16, color: Color) -> bool {
        if self.session.version() != Some(ProtocolVersion::V2) {
            debug!("Rectangles are V2 only");
            return false;
        }

        let content = request::v2_rect(x1, y1, x2, y2, color);
        let sent = self.link.send_v2(V2Command::DrawRect, 0, &content).await;
        self.confirm("Draw rect", sent).await
    }

    /// Remove all rectangles from the device screen (V2 only)
    pub async fn clear_rect(&mut self) -> bool {
        if self.session.version() != Some(ProtocolVersion::V2) {
            debug!("Rectangles are V2 only");
            return false;
        }

        let sent = self.link.send_v2(V2Command::ClearRect, 0, &[]).await;
        self.confirm("Clear rect", sent).await
    }

    /// Firmware version string (V1 only)
    pub async fn get_firmware_version(&mut self) -> Option<String> {
        match self.firmware_version_v1().await {
            Ok(version) => version,
            Err(e) => {
                debug!("Firmware version query failed: {}", e);
                None
            }
        }
    }

    // Helper methods

    /// Knock using `version` without touching the session
    async fn knock_as(&mut self, version: ProtocolVersion) -> bool {
        let timing = *self.link.timing();

        match version {
            ProtocolVersion::V1 => {
                if let Err(e) = self.link.send_knock(version).await {
                    debug!("Knock write failed: {}", e);
                }
                for _ in 0..timing.knock_attempts_v1 {
                    match self.link.read_v1().await {
                        Ok(frame) if frame.command == V1Command::ReturnOk => return true,
                        Ok(frame) => debug!("Knock got {} instead of OK", frame.command),
                        Err(e) => debug!("Knock read failed: {}", e),
                    }
                    sleep(timing.knock_retry_v1).await;
                }
            }
            ProtocolVersion::V2 => {
                for _ in 0..timing.knock_attempts_v2 {
                    match self.knock_round_v2().await {
                        Ok(true) => return true,
                        Ok(false) => {}
                        Err(e) => debug!("Knock round failed: {}", e),
                    }
                    sleep(timing.knock_retry_v2).await;
                }
            }
        }

        false
    }

    async fn knock_round_v2(&mut self) -> Result<bool> {
        self.link.send_knock(ProtocolVersion::V2).await?;
        let reply = self.link.read_raw(V2_KNOCK_REPLY_SIZE).await?;

        Ok(reply.len() >= 3
            && reply[..HEADER_V2.len()] == HEADER_V2
            && reply[2] == u8::from(V2Command::ReturnOk))
    }

    /// Knock after a command write, degrading write errors to `false`
    async fn confirm(&mut self, what: &str, sent: Result<()>) -> bool {
        if let Err(e) = sent {
            debug!("{} failed: {}", what, e);
            return false;
        }
        self.knock().await
    }

    async fn collect_v1(&mut self, query: &ResultQuery) -> Result<ResultSet> {
        match (query.id, query.learned_only) {
            (Some(id), _) => {
                let payload = request::v1_id(id);
                self.link.send_v1(V1Command::RequestById, &payload).await?
            }
            (None, true) => self.link.send_v1(V1Command::RequestLearned, &[]).await?,
            (None, false) => self.link.send_v1(V1Command::Request, &[]).await?,
        }

        let info = self.link.read_v1().await?;
        if info.command != V1Command::ReturnInfo {
            return Err(huskylens_core::Error::UnexpectedCommand(info.command.to_string()).into());
        }

        let count = decode::v1_object_count(&info.payload);
        let mut results = ResultSet::new();

        for _ in 0..count.max(0) {
            let detection = match self.link.read_v1().await {
                Ok(frame) => decode::decode_v1(&frame).map_err(Error::from),
                Err(e) => Err(e),
            };

            match detection {
                Ok(detection) => results.push(detection),
                Err(e) if e.is_recoverable() => debug!("Skipping result frame: {}", e),
                Err(e) => warn!("Result frame lost: {}", e),
            }
        }

        Ok(results)
    }

    async fn collect_v2(&mut self, algorithm: Algorithm) -> Result<ResultSet> {
        let timing = *self.link.timing();

        self.link
            .send_v2(V2Command::GetResult, algorithm.id(), &[])
            .await?;
        sleep(timing.v2_initial).await;

        let info = self.link.read_v2().await?;
        if info.command != V2Command::ReturnInfo {
            return Err(huskylens_core::Error::UnexpectedCommand(info.command.to_string()).into());
        }

        let count = decode::v2_result_count(&info);
        let mut results = ResultSet::new();

        for _ in 0..count.max(0) {
            sleep(timing.v2_between).await;

            let detection = match self.link.read_v2().await {
                Ok(frame) => decode::decode_v2(&frame, algorithm).map_err(Error::from),
                Err(e) => Err(e),
            };

            match detection {
                Ok(detection) => results.push(detection),
                Err(e) if e.is_recoverable() => debug!("Skipping result frame: {}", e),
                Err(e) => warn!("Result frame lost: {}", e),
            }
        }

        Ok(results)
    }

    async fn firmware_version_v1(&mut self) -> Result<Option<String>> {
        match self.session.version() {
            Some(ProtocolVersion::V1) => {}
            Some(ProtocolVersion::V2) => {
                return Err(Error::NotSupported("firmware version on V2".into()));
            }
            None => return Err(Error::VersionUnknown),
        }

        self.link
            .send_v1(V1Command::RequestFirmwareVersion, &[])
            .await?;
        let frame = self.link.read_v1().await?;

        if frame.payload.is_empty() {
            return Ok(None);
        }

        match std::str::from_utf8(&frame.payload) {
            Ok(version) => Ok(Some(version.to_owned())),
            Err(e) => {
                debug!("Firmware version is not UTF-8: {}", e);
                Ok(None)
            }
        }
    }
}
