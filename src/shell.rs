use std::future::Future;
use std::io::{BufRead, Write};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use api::request::TimelineQuery;
use cli::CommandTemplate;
use playback::{Direction, LiveStream, Outcome, PlaybackController, PlaybackSnapshot};
use session::{FileStore, Session};

use crate::player::ProcessSurface;

type Viewer = PlaybackController<camclient::Client, ProcessSurface>;

const HELP: &str = "\
commands:
  login <token>          sign in with a personal access token
  logout                 forget the stored session
  whoami                 show the signed in account
  cameras                list cameras
  open <camera id>       open live view and recordings of a camera
  live                   refresh the live stream
  watch                  play the live stream
  filter <start> <end>   load recordings between two dates (RFC 3339 or YYYY-MM-DD)
  segments               list recorded segments
  play <n>               play segment n
  prev | next            play the neighbouring segment
  seek <hh:mm:ss>        jump within the playing segment
  close                  stop playback and close the camera
  help                   show this help
  quit                   exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login(String),
    Logout,
    Whoami,
    Cameras,
    Open(u64),
    Live,
    Watch,
    Filter(DateTime<Utc>, DateTime<Utc>),
    Segments,
    /// 1-based position in the segment list
    Play(usize),
    Prev,
    Next,
    Seek(String),
    Close,
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((name, args)) = words.split_first() else {
        return Ok(None);
    };

    let command = match (name.to_ascii_lowercase().as_str(), args) {
        ("login", [token]) => Command::Login(token.to_string()),
        ("login", _) => return Err(anyhow!("usage: login <token>")),
        ("logout", []) => Command::Logout,
        ("whoami", []) => Command::Whoami,
        ("cameras", []) => Command::Cameras,
        ("open", [id]) => Command::Open(
            id.parse()
                .map_err(|_| anyhow!("invalid camera id: {}", id))?,
        ),
        ("open", _) => return Err(anyhow!("usage: open <camera id>")),
        ("live", []) => Command::Live,
        ("watch", []) => Command::Watch,
        ("filter", [start, end]) => Command::Filter(parse_date(start)?, parse_date(end)?),
        ("filter", _) => return Err(anyhow!("usage: filter <start> <end>")),
        ("segments", []) => Command::Segments,
        ("play", [n]) => match n.parse::<usize>() {
            Ok(n) if n > 0 => Command::Play(n),
            _ => return Err(anyhow!("invalid segment number: {}", n)),
        },
        ("play", _) => return Err(anyhow!("usage: play <n>")),
        ("prev", []) => Command::Prev,
        ("next", []) => Command::Next,
        ("seek", [time]) => Command::Seek(time.to_string()),
        ("seek", _) => return Err(anyhow!("usage: seek <hh:mm:ss>")),
        ("close", []) => Command::Close,
        ("help", _) | ("?", _) => Command::Help,
        ("quit", []) | ("exit", []) => Command::Quit,
        (name, []) => return Err(anyhow!("unknown command: {}, try help", name)),
        (name, _) => return Err(anyhow!("unexpected arguments for {}", name)),
    };
    Ok(Some(command))
}

/// RFC 3339 timestamp, or a `YYYY-MM-DD` date taken as midnight UTC.
pub fn parse_date(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Ok(datetime.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("invalid date: {}", value))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| anyhow!("invalid date: {}", value))?;
    Ok(Utc.from_utc_datetime(&midnight))
}

pub fn format_live(live: &LiveStream) -> String {
    match live {
        LiveStream::Pending => "live: loading".to_string(),
        LiveStream::Available(stream) => format!("live: {} {}", stream.format, stream.url),
        LiveStream::Unavailable => "live: no live stream available".to_string(),
        LiveStream::Failed(e) => format!("live: error: {}", e),
    }
}

pub fn format_segments(snapshot: &PlaybackSnapshot) -> String {
    let mut out = format!(
        "recordings {} .. {}:",
        snapshot.query.start.to_rfc3339(),
        snapshot.query.end.to_rfc3339()
    );
    if let Some(e) = &snapshot.timeline_error {
        out.push_str(&format!("\n  error: {}", e));
    }
    if snapshot.segments.is_empty() {
        out.push_str("\n  no recordings");
    }
    for (i, segment) in snapshot.segments.iter().enumerate() {
        let marker = if snapshot.active.segment_index == Some(i) {
            '*'
        } else {
            ' '
        };
        out.push_str(&format!(
            "\n{}{:>3}  {} .. {}  ({}s)",
            marker,
            i + 1,
            segment.start.to_rfc3339(),
            segment.end.to_rfc3339(),
            segment.duration().num_seconds()
        ));
    }
    out
}

fn format_playback(snapshot: &PlaybackSnapshot) -> String {
    if snapshot.active.is_live() {
        let url = snapshot.active.stream_url.as_deref().unwrap_or_default();
        return format!("playing live {}", url);
    }
    match (&snapshot.active.stream_url, snapshot.active.segment_index) {
        (Some(url), Some(i)) => format!(
            "playing segment {}/{} {}",
            i + 1,
            snapshot.segments.len(),
            url
        ),
        (Some(url), None) => format!("playing {} (not in the current timeline)", url),
        (None, _) => match &snapshot.segment_error {
            Some(e) => format!("not playing: {}", e),
            None => "not playing".to_string(),
        },
    }
}

/// Feeds the lines of `reader` into a channel from a dedicated thread.
///
/// A blocking read cannot be cancelled. It runs outside the runtime so that dropping the runtime
/// never waits for the next line.
pub fn spawn_line_reader<R>(reader: R) -> mpsc::Receiver<String>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(16);
    let spawned = std::thread::Builder::new()
        .name("input".to_string())
        .spawn(move || {
            for line in reader.lines() {
                match line {
                    Ok(line) => {
                        if tx.blocking_send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("read input: {}", e);
                        break;
                    }
                }
            }
        });
    if let Err(e) = spawned {
        warn!("failed to start input reader: {}", e);
    }
    rx
}

pub fn stdin_lines() -> mpsc::Receiver<String> {
    spawn_line_reader(std::io::BufReader::new(std::io::stdin()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Shell {
    client: camclient::Client,
    store: FileStore,
    session: Option<Session>,
    template: CommandTemplate,
    default_query: TimelineQuery,
    viewer: Option<Viewer>,
}

impl Shell {
    pub fn new(
        client: camclient::Client,
        mut store: FileStore,
        template: CommandTemplate,
        default_query: TimelineQuery,
    ) -> Result<Self> {
        let session = session::restore(&mut store)?;
        Ok(Self {
            client,
            store,
            session,
            template,
            default_query,
            viewer: None,
        })
    }

    /// Runs commands from `lines` until `quit`, end of input or `shutdown` resolves.
    pub async fn run(
        mut self,
        mut lines: mpsc::Receiver<String>,
        shutdown: impl Future<Output = ()>,
    ) -> Result<()> {
        tokio::pin!(shutdown);

        match &self.session {
            Some(session) => self.print_account(session),
            None => println!("not signed in, use: login <token>"),
        }

        loop {
            print!("camdeck> ");
            std::io::stdout().flush()?;

            let line = tokio::select! {
                line = lines.recv() => line,
                _ = &mut shutdown => break,
            };
            let Some(line) = line else {
                debug!("end of input");
                break;
            };

            let command = match parse_command(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    println!("{}", e);
                    continue;
                }
            };

            let flow = tokio::select! {
                flow = self.execute(command) => flow,
                _ = &mut shutdown => break,
            };
            match flow {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => println!("error: {:#}", e),
            }
        }

        self.close_viewer();
        info!("shell exited");
        Ok(())
    }

    async fn execute(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Login(token) => self.login(token).await?,
            Command::Logout => {
                self.close_viewer();
                session::logout(&mut self.store)?;
                self.session = None;
                println!("signed out");
            }
            Command::Whoami => {
                let session = self.session()?;
                self.print_account(session);
            }
            Command::Cameras => {
                let token = self.session()?.token.clone();
                let cameras = self.client.cameras(&token).await?;
                if cameras.is_empty() {
                    println!("no cameras");
                }
                for camera in cameras {
                    println!(
                        "{:>8}  {:<24} {:<10} {}",
                        camera.id,
                        camera.name,
                        camera.status,
                        if camera.has_recording {
                            "recording"
                        } else {
                            ""
                        }
                    );
                }
            }
            Command::Open(camera_id) => self.open(camera_id).await?,
            Command::Live => {
                let viewer = self.viewer()?;
                if let Err(e) = viewer.refresh_live_stream().await {
                    debug!("live stream refresh failed: {}", e);
                }
                println!("{}", format_live(&viewer.snapshot().live));
            }
            Command::Watch => {
                let viewer = self.viewer()?;
                match viewer.watch_live()? {
                    Outcome::Disabled => println!("{}", format_live(&viewer.snapshot().live)),
                    _ => println!("{}", format_playback(&viewer.snapshot())),
                }
            }
            Command::Filter(start, end) => {
                let viewer = self.viewer()?;
                match viewer.set_timeline_filter(start, end).await? {
                    Outcome::Applied => println!("{}", format_segments(&viewer.snapshot())),
                    outcome => debug!("filter {:?}", outcome),
                }
            }
            Command::Segments => println!("{}", format_segments(&self.viewer()?.snapshot())),
            Command::Play(n) => {
                let viewer = self.viewer()?;
                let snapshot = viewer.snapshot();
                let segment = snapshot.segments.get(n - 1).copied().ok_or_else(|| {
                    anyhow!(
                        "no segment {}, the timeline has {}",
                        n,
                        snapshot.segments.len()
                    )
                })?;
                viewer.select_segment(segment).await?;
                println!("{}", format_playback(&viewer.snapshot()));
            }
            Command::Prev => self.step(Direction::Previous).await?,
            Command::Next => self.step(Direction::Next).await?,
            Command::Seek(time) => match self.viewer()?.seek_absolute(&time)? {
                Outcome::Rejected => println!("expected hh:mm:ss, got {}", time),
                Outcome::Disabled => println!("no recording is playing"),
                _ => println!("seek to {}", time),
            },
            Command::Close => {
                if self.viewer.is_none() {
                    println!("no camera is open");
                }
                self.close_viewer();
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    async fn login(&mut self, token: String) -> Result<()> {
        match self.client.login(&token).await {
            Ok(account) => {
                session::save(&mut self.store, &token, &account)?;
                let session = Session { token, account };
                self.print_account(&session);
                self.session = Some(session);
            }
            Err(e) => {
                warn!("login failed: {:#}", e);
                println!("login failed: {:#}", e);
            }
        }
        Ok(())
    }

    async fn open(&mut self, camera_id: u64) -> Result<()> {
        let token = self.session()?.token.clone();
        self.close_viewer();

        let viewer = PlaybackController::new(
            self.client.clone(),
            ProcessSurface::new(self.template.clone()),
            self.default_query,
        );
        viewer.initialize(camera_id, &token).await?;

        let snapshot = viewer.snapshot();
        println!("camera {}", camera_id);
        println!("{}", format_live(&snapshot.live));
        println!("{}", format_segments(&snapshot));
        self.viewer = Some(viewer);
        Ok(())
    }

    async fn step(&self, direction: Direction) -> Result<()> {
        let viewer = self.viewer()?;
        match viewer.select_adjacent_segment(direction).await? {
            Outcome::Disabled => match direction {
                Direction::Previous => println!("no previous segment"),
                Direction::Next => println!("no next segment"),
            },
            _ => println!("{}", format_playback(&viewer.snapshot())),
        }
        Ok(())
    }

    fn close_viewer(&mut self) {
        if let Some(viewer) = self.viewer.take() {
            if viewer.teardown() {
                println!("playback stopped");
            }
        }
    }

    fn session(&self) -> Result<&Session> {
        self.session
            .as_ref()
            .ok_or_else(|| anyhow!("not signed in, use: login <token>"))
    }

    fn viewer(&self) -> Result<&Viewer> {
        self.viewer
            .as_ref()
            .ok_or_else(|| anyhow!("no camera is open, use: open <camera id>"))
    }

    fn print_account(&self, session: &Session) {
        match &session.account.data {
            Some(user) => {
                println!("signed in as {} <{}>", user.display_name(), user.email);
                println!(
                    "cameras: {} mine, {} shared, {} total",
                    user.my_cameras_count, user.shared_cameras_count, user.total_cameras_count
                );
            }
            None => println!("signed in"),
        }
    }
}

#[cfg(test)]
mod tests {
    use api::recorder::RecordingSegment;
    use playback::ActiveSegmentPlayback;

    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("  ").unwrap(), None);
        assert_eq!(
            parse_command("login abc").unwrap(),
            Some(Command::Login("abc".to_string()))
        );
        assert_eq!(parse_command("OPEN 42").unwrap(), Some(Command::Open(42)));
        assert_eq!(parse_command("play 2").unwrap(), Some(Command::Play(2)));
        assert_eq!(
            parse_command("seek 01:02:03").unwrap(),
            Some(Command::Seek("01:02:03".to_string()))
        );
        assert_eq!(parse_command("exit").unwrap(), Some(Command::Quit));
    }

    #[test]
    fn test_parse_command_errors() {
        assert!(parse_command("open").is_err());
        assert!(parse_command("open abc").is_err());
        assert!(parse_command("play 0").is_err());
        assert!(parse_command("login").is_err());
        assert!(parse_command("dance").is_err());
        assert!(parse_command("next 2").is_err());
    }

    #[test]
    fn test_parse_filter() {
        let command = parse_command("filter 2024-08-08 2024-08-09T09:00:00+02:00")
            .unwrap()
            .unwrap();
        assert_eq!(
            command,
            Command::Filter(
                Utc.with_ymd_and_hms(2024, 8, 8, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 8, 9, 7, 0, 0).unwrap(),
            )
        );
        assert!(parse_command("filter 2024-13-01 2024-08-09").is_err());
    }

    #[test]
    fn test_format_live() {
        assert_eq!(
            format_live(&LiveStream::Unavailable),
            "live: no live stream available"
        );
        assert_eq!(
            format_live(&LiveStream::Failed("resource not exists".to_string())),
            "live: error: resource not exists"
        );
    }

    #[test]
    fn test_format_segments_marks_active() {
        let segment = RecordingSegment::new(
            Utc.with_ymd_and_hms(2024, 8, 8, 10, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 8, 8, 10, 5, 0).unwrap(),
        );
        let snapshot = PlaybackSnapshot {
            camera_id: Some(1),
            live: LiveStream::Unavailable,
            live_loading: false,
            query: TimelineQuery::default(),
            segments: vec![segment],
            timeline_loading: false,
            timeline_error: None,
            active: ActiveSegmentPlayback {
                segment_index: Some(0),
                stream_url: Some("http://cam/seg.m3u8".to_string()),
                segment: Some(segment),
            },
            segment_loading: false,
            segment_error: None,
        };
        let out = format_segments(&snapshot);
        assert!(out.contains(
            "*  1  2024-08-08T10:00:00+00:00 .. 2024-08-08T10:05:00+00:00  (300s)"
        ));
        assert_eq!(
            format_playback(&snapshot),
            "playing segment 1/1 http://cam/seg.m3u8"
        );
    }

    #[test]
    fn test_watch_live() {
        assert_eq!(parse_command("watch").unwrap(), Some(Command::Watch));
        assert!(parse_command("watch now").is_err());

        let snapshot = PlaybackSnapshot {
            camera_id: Some(1),
            live: LiveStream::Unavailable,
            live_loading: false,
            query: TimelineQuery::default(),
            segments: vec![],
            timeline_loading: false,
            timeline_error: None,
            active: ActiveSegmentPlayback {
                segment_index: None,
                stream_url: Some("http://cam/live.mp4".to_string()),
                segment: None,
            },
            segment_loading: false,
            segment_error: None,
        };
        assert_eq!(
            format_playback(&snapshot),
            "playing live http://cam/live.mp4"
        );
    }

    fn offline_shell(dir: &tempfile::TempDir) -> Shell {
        let client = camclient::Client::new(
            "http://127.0.0.1:1".to_string(),
            Some(std::time::Duration::from_secs(1)),
        )
        .unwrap();
        let store = FileStore::open(dir.path().join("session.json")).unwrap();
        let template = CommandTemplate::parse("true {url}").unwrap();
        Shell::new(client, store, template, TimelineQuery::default()).unwrap()
    }

    #[tokio::test]
    async fn test_run_until_quit() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = mpsc::channel(4);
        tx.send("help".to_string()).await.unwrap();
        tx.send("quit".to_string()).await.unwrap();
        let run = offline_shell(&dir).run(rx, std::future::pending());
        let result = tokio::time::timeout(std::time::Duration::from_secs(5), run).await;
        assert!(result.unwrap().is_ok());
        drop(tx);
    }

    #[tokio::test]
    async fn test_run_until_end_of_input() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = mpsc::channel::<String>(1);
        drop(tx);
        let run = offline_shell(&dir).run(rx, std::future::pending());
        let result = tokio::time::timeout(std::time::Duration::from_secs(5), run).await;
        assert!(result.unwrap().is_ok());
    }

    // The reader side of the pair blocks for as long as the writer is alive.
    #[cfg(unix)]
    #[test]
    fn test_shutdown_with_input_open() {
        use std::os::unix::net::UnixStream;

        let (reader, writer) = UnixStream::pair().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let shell = offline_shell(&dir);
        let (done_tx, done_rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            let lines = spawn_line_reader(std::io::BufReader::new(reader));
            let result = runtime.block_on(shell.run(lines, async {}));
            drop(runtime);
            done_tx.send(result.is_ok()).unwrap();
        });
        let done = done_rx.recv_timeout(std::time::Duration::from_secs(5));
        assert_eq!(done, Ok(true));
        drop(writer);
    }

    #[test]
    fn test_line_reader_forwards_lines() {
        let input = std::io::Cursor::new("cameras\nquit\n");
        let mut lines = spawn_line_reader(input);
        assert_eq!(lines.blocking_recv().as_deref(), Some("cameras"));
        assert_eq!(lines.blocking_recv().as_deref(), Some("quit"));
        assert_eq!(lines.blocking_recv(), None);
    }
}
