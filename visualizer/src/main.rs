use geoarcore::geo::GeoPosition;
use geoarcore::orientation::DevicePose;
use geoarcore::render::{self as overlay, DrawCommand, Shape};
use geoarcore::telemetry::MetricsSnapshot;
use geoarcore::OverlayConfig;
use iced::{
    mouse, time,
    widget::{
        button,
        canvas::{self, Canvas, Frame, Geometry, Path, Stroke},
        column, row, scrollable, text, text_input, Column, Container,
    },
    Alignment, Color, Element, Length, Pixels, Point, Rectangle, Renderer, Size, Subscription,
    Task, Theme, Vector,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const BRIDGE_URL: &str = "http://127.0.0.1:9000";

fn main() -> iced::Result {
    iced::application(Visualizer::boot, Visualizer::update, Visualizer::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Visualizer) -> String {
    "GeoAR Overlay Viewer".into()
}

fn application_subscription(_: &Visualizer) -> Subscription<Message> {
    time::every(Duration::from_secs(1)).map(|_| Message::Tick)
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Dark
}

#[derive(Debug)]
struct Visualizer {
    form: ScenarioForm,
    payload: Option<OverlayPayload>,
    status: String,
    history: Vec<String>,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    PayloadFetched(Result<OverlayPayload, String>),
    FormFieldChanged(FormField, String),
    SubmitScenario,
    ScenarioSubmitted(Result<String, String>),
}

#[derive(Debug, Clone, Copy)]
enum FormField {
    Name,
    Latitude,
    Longitude,
    Heading,
    Pitch,
    Declination,
    Noise,
    Seed,
    RangeKm,
}

impl Visualizer {
    fn boot() -> (Self, Task<Message>) {
        (
            Visualizer {
                form: ScenarioForm::default(),
                payload: None,
                status: "Waiting for the simulator bridge...".into(),
                history: Vec::new(),
            },
            Task::perform(fetch_payload(), Message::PayloadFetched),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => Task::perform(fetch_payload(), Message::PayloadFetched),
            Message::PayloadFetched(Ok(payload)) => {
                state.status = format!(
                    "Frame received: azimuth {:.1}º, {} commands",
                    payload.azimuth,
                    payload.commands.len()
                );
                if state.payload.as_ref().map(|p| &p.scenario) != Some(&payload.scenario) {
                    state.push_history(format!("Scenario '{}' loaded", payload.scenario));
                }
                state.payload = Some(payload);
                Task::none()
            }
            Message::PayloadFetched(Err(err)) => {
                state.status = format!("Bridge error: {err}");
                Task::none()
            }
            Message::FormFieldChanged(field, value) => {
                state.form.update_field(field, value);
                Task::none()
            }
            Message::SubmitScenario => match state.form.to_request() {
                Ok(request) => Task::perform(post_scenario(request), Message::ScenarioSubmitted),
                Err(err) => {
                    state.status = err;
                    Task::none()
                }
            },
            Message::ScenarioSubmitted(Ok(message)) => {
                state.status = message;
                state.push_history("Scenario submitted".into());
                Task::none()
            }
            Message::ScenarioSubmitted(Err(err)) => {
                state.status = format!("Scenario error: {err}");
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let form = &state.form;

        let form_column = column![
            text("Scenario").size(26),
            input("Name", &form.name, FormField::Name),
            input("Latitude (deg)", &form.latitude, FormField::Latitude),
            input("Longitude (deg)", &form.longitude, FormField::Longitude),
            input("Heading (deg, true)", &form.heading, FormField::Heading),
            input("Pitch (deg)", &form.pitch, FormField::Pitch),
            input("Declination (deg, blank = dipole)", &form.declination, FormField::Declination),
            input("Sensor noise", &form.noise, FormField::Noise),
            input("Seed", &form.seed, FormField::Seed),
            input("Radar range (km)", &form.range_km, FormField::RangeKm),
            button("POST scenario")
                .on_press(Message::SubmitScenario)
                .padding(10),
            text(&state.status).size(14),
            column![
                text("Field notes").size(16),
                text("Heading: where the camera points, clockwise from true north.").size(12),
                text("Declination: offset of magnetic north; left blank, a dipole field model is used.")
                    .size(12),
                text("Sensor noise: peak jitter added to each accelerometer and magnetometer axis.")
                    .size(12),
                text("Radar range: POIs further than this are neither drawn nor plotted.").size(12),
            ]
            .spacing(4)
            .padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(360.0));

        let summary = match &state.payload {
            Some(p) => text(format!(
                "Azimuth {:.1}º | pitch {:.1}º | declination {:.2}º | radar {:.1} km",
                p.azimuth,
                p.pitch,
                p.declination,
                p.radar_range_m / 1000.0
            ))
            .size(18),
            None => text("No frame yet").size(18),
        };

        let scene = state
            .payload
            .as_ref()
            .map(|p| OverlayScene {
                commands: p.commands.clone(),
                width: p.width.max(1) as f32,
                height: p.height.max(1) as f32,
            })
            .unwrap_or_else(|| OverlayScene {
                commands: Vec::new(),
                width: 800.0,
                height: 480.0,
            });
        let aspect = scene.height / scene.width;
        let scene = Canvas::new(scene)
            .width(Length::Fill)
            .height(Length::Fixed(640.0 * aspect));

        let visible_list = match &state.payload {
            Some(p) if !p.visible.is_empty() => p.visible.iter().fold(
                Column::new().spacing(4),
                |col, name| {
                    let marker = if p.centered.as_ref() == Some(name) { " (centred)" } else { "" };
                    col.push(text(format!("{name}{marker}")).size(12))
                },
            ),
            _ => Column::new().push(text("Nothing in view").size(12)),
        };

        let metrics = state
            .payload
            .as_ref()
            .map(|p| {
                format!(
                    "fused {} | rejected {} | frames {} | frames without fix {}",
                    p.metrics.samples_fused,
                    p.metrics.samples_rejected,
                    p.metrics.frames_rendered,
                    p.metrics.frames_without_location
                )
            })
            .unwrap_or_default();

        let history_list = if state.history.is_empty() {
            Column::new().push(text("No activity yet").size(12))
        } else {
            state
                .history
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, entry| {
                    col.push(text(entry.clone()).size(12))
                })
        };

        let overlay_column = column![
            text("Overlay").size(26),
            summary,
            scene,
            text("Visible POIs").size(16),
            Container::new(visible_list).padding(6),
            text(metrics).size(12),
            text("Activity log").size(16),
            Container::new(scrollable(history_list).height(Length::Fixed(90.0))).padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fill);

        let layout = row![form_column, overlay_column]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

fn input<'a>(label: &str, value: &'a str, field: FormField) -> Element<'a, Message> {
    text_input(label, value)
        .on_input(move |v| Message::FormFieldChanged(field, v))
        .padding(6)
        .into()
}

async fn fetch_payload() -> Result<OverlayPayload, String> {
    let response = reqwest::get(format!("{BRIDGE_URL}/payload"))
        .await
        .map_err(|e| e.to_string())?;
    response
        .json::<OverlayPayload>()
        .await
        .map_err(|e| e.to_string())
}

async fn post_scenario(request: ScenarioRequest) -> Result<String, String> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{BRIDGE_URL}/ingest-config"))
        .json(&request)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if response.status().is_success() {
        Ok("Scenario submitted".into())
    } else {
        let status = response.status();
        let text = response.text().await.unwrap_or_else(|_| "".into());
        Err(format!("{}: {}", status, text))
    }
}

#[derive(Debug, Clone)]
struct ScenarioForm {
    name: String,
    latitude: String,
    longitude: String,
    heading: String,
    pitch: String,
    declination: String,
    noise: String,
    seed: String,
    range_km: String,
}

impl Default for ScenarioForm {
    fn default() -> Self {
        Self {
            name: "Viewer scenario".into(),
            latitude: "38.7223".into(),
            longitude: "-9.1393".into(),
            heading: "45".into(),
            pitch: "0".into(),
            declination: String::new(),
            noise: "0.05".into(),
            seed: "7".into(),
            range_km: "2".into(),
        }
    }
}

fn parse_field<T: std::str::FromStr>(label: &str, value: &str) -> Result<T, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("{label}: '{value}' is not a number"))
}

impl ScenarioForm {
    fn update_field(&mut self, field: FormField, value: String) {
        match field {
            FormField::Name => self.name = value,
            FormField::Latitude => self.latitude = value,
            FormField::Longitude => self.longitude = value,
            FormField::Heading => self.heading = value,
            FormField::Pitch => self.pitch = value,
            FormField::Declination => self.declination = value,
            FormField::Noise => self.noise = value,
            FormField::Seed => self.seed = value,
            FormField::RangeKm => self.range_km = value,
        }
    }

    fn to_request(&self) -> Result<ScenarioRequest, String> {
        let declination = if self.declination.trim().is_empty() {
            DeclinationRequest::Dipole
        } else {
            DeclinationRequest::Fixed {
                degrees: parse_field("Declination", &self.declination)?,
            }
        };
        Ok(ScenarioRequest {
            name: (!self.name.trim().is_empty()).then(|| self.name.clone()),
            location: GeoPosition::new(
                parse_field("Latitude", &self.latitude)?,
                parse_field("Longitude", &self.longitude)?,
                0.0,
            ),
            pose: DevicePose::new(
                parse_field("Heading", &self.heading)?,
                parse_field("Pitch", &self.pitch)?,
            ),
            declination,
            sensor_noise: parse_field("Sensor noise", &self.noise)?,
            seed: parse_field("Seed", &self.seed)?,
            overlay: OverlayConfig {
                radar_range_km: parse_field("Radar range", &self.range_km)?,
                ..OverlayConfig::default()
            },
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "model", rename_all = "snake_case")]
enum DeclinationRequest {
    Fixed { degrees: f64 },
    Dipole,
}

#[derive(Debug, Serialize)]
struct ScenarioRequest {
    name: Option<String>,
    location: GeoPosition,
    pose: DevicePose,
    declination: DeclinationRequest,
    sensor_noise: f64,
    seed: u64,
    overlay: OverlayConfig,
}

#[derive(Debug, Clone, Deserialize)]
struct OverlayPayload {
    #[serde(default)]
    scenario: String,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    azimuth: f64,
    #[serde(default)]
    pitch: f64,
    #[serde(default)]
    declination: f64,
    #[serde(default)]
    radar_range_m: f64,
    #[serde(default)]
    visible: Vec<String>,
    #[serde(default)]
    centered: Option<String>,
    #[serde(default)]
    commands: Vec<DrawCommand>,
    #[serde(default)]
    metrics: MetricsSnapshot,
}

fn to_iced(color: overlay::Color) -> Color {
    Color::from_rgba8(color.r, color.g, color.b, f32::from(color.a) / 255.0)
}

/// Replays recorded overlay draw commands onto an iced canvas.
#[derive(Clone)]
struct OverlayScene {
    commands: Vec<DrawCommand>,
    /// Viewport the commands were recorded against, in pixels.
    width: f32,
    height: f32,
}

impl OverlayScene {
    /// Uniform scale that fits the recorded viewport inside `bounds`.
    fn fit_scale(&self, bounds: Size) -> f32 {
        (bounds.width / self.width).min(bounds.height / self.height)
    }

    fn draw_command(frame: &mut Frame, command: &DrawCommand) {
        let paint = &command.paint;
        let color = to_iced(paint.color);
        let (dx, dy) = command.transform.offset();

        frame.with_save(|frame| {
            frame.translate(Vector::new(dx as f32, dy as f32));
            frame.rotate(command.transform.angle() as f32);

            let path = match &command.shape {
                Shape::Circle { cx, cy, radius } => {
                    Path::circle(Point::new(*cx as f32, *cy as f32), *radius as f32)
                }
                Shape::Line { x1, y1, x2, y2 } => Path::line(
                    Point::new(*x1 as f32, *y1 as f32),
                    Point::new(*x2 as f32, *y2 as f32),
                ),
                Shape::RoundRect { rect, rx, .. } => Path::rounded_rectangle(
                    Point::new(rect.left as f32, rect.top as f32),
                    Size::new(rect.width() as f32, rect.height() as f32),
                    (*rx as f32).into(),
                ),
                Shape::Text { text, x, y } => {
                    // recorded y is the baseline; iced anchors text at its top
                    let ascent = paint.text_size * 0.928;
                    frame.fill_text(canvas::Text {
                        content: text.clone(),
                        position: Point::new(*x as f32, (*y - ascent) as f32),
                        color,
                        size: Pixels(paint.text_size as f32),
                        ..canvas::Text::default()
                    });
                    return;
                }
            };

            match paint.style {
                overlay::Style::Fill => frame.fill(&path, color),
                overlay::Style::Stroke => frame.stroke(
                    &path,
                    Stroke::default()
                        .with_color(color)
                        .with_width(paint.stroke_width.max(1.0) as f32),
                ),
            }
        });
    }
}

impl canvas::Program<Message> for OverlayScene {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.08, 0.1, 0.12),
        );

        frame.with_save(|frame| {
            frame.scale(self.fit_scale(bounds.size()));
            for command in &self.commands {
                Self::draw_command(frame, command);
            }
        });

        vec![frame.into_geometry()]
    }
}
