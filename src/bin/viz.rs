//! Black-Scholes Visualization
//!
//! Interactive charts of option prices against spot, volatility and time to
//! expiry, with an optional Greek panel and ticker seeding.

use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints, VLine};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bs_options::prelude::*;

struct VizApp {
    // Inputs
    spot: f64,
    strike: f64,
    time: f64,
    rate: f64,
    vol: f64,

    // Ticker fetch
    ticker_input: String,
    fetch_status: String,
    source: Option<CachedSource<YahooClient>>,

    // Display
    show_greek: bool,
    greek: Greek,
    greek_type: OptionType,

    config: AppConfig,
}

impl VizApp {
    fn new(config: AppConfig) -> Self {
        let d = config.defaults.clone();
        Self {
            spot: d.spot,
            strike: d.strike,
            time: d.time_to_expiry,
            rate: d.risk_free_rate,
            vol: d.volatility,
            ticker_input: String::new(),
            fetch_status: String::new(),
            source: None,
            show_greek: false,
            greek: Greek::Delta,
            greek_type: OptionType::Call,
            config,
        }
    }

    fn params(&self) -> BsResult<OptionParams> {
        OptionParams::new(self.spot, self.strike, self.time, self.rate, self.vol)
    }

    fn fetch(&mut self) {
        let ticker = self.ticker_input.trim().to_uppercase();
        if ticker.is_empty() {
            self.fetch_status = "Enter a ticker symbol".to_string();
            return;
        }

        if self.source.is_none() {
            let source = YahooClient::new(self.config.yahoo.clone())
                .and_then(|yahoo| CachedSource::new(yahoo, self.config.cache.clone()));
            match source {
                Ok(s) => self.source = Some(s),
                Err(e) => {
                    self.fetch_status = format!("Error: {}", e);
                    return;
                }
            }
        }
        let Some(source) = &self.source else { return };

        match source.stock_info(&ticker) {
            Ok(info) => {
                self.spot = info.current_price;
                self.strike = info.current_price.round();
                self.vol = info.volatility;
                self.fetch_status = format!(
                    "{}: ${:.2}, vol {:.2}%",
                    info.symbol,
                    info.current_price,
                    info.volatility * 100.0
                );
            }
            Err(e) => {
                tracing::warn!("fetch failed for {}: {}", ticker, e);
                self.fetch_status = format!("Error: {}", e);
            }
        }
    }

    fn price_plot(&self, ui: &mut egui::Ui, base: &OptionParams, variable: SweepVariable) {
        let range = self.config.sweep.range_for(variable, base);
        let curve = match price_curve(base, variable, &range) {
            Ok(c) => c,
            Err(e) => {
                ui.label(format!("{}: {}", variable.label(), e));
                return;
            }
        };

        Plot::new(format!("price_vs_{:?}", variable))
            .view_aspect(2.5)
            .x_axis_label(variable.label())
            .y_axis_label("Option Price ($)")
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::new(curve.points(OptionType::Call)))
                        .name("Call Option")
                        .color(egui::Color32::LIGHT_BLUE)
                        .width(2.0),
                );
                plot_ui.line(
                    Line::new(PlotPoints::new(curve.points(OptionType::Put)))
                        .name("Put Option")
                        .color(egui::Color32::LIGHT_RED)
                        .width(2.0),
                );
                if variable == SweepVariable::Spot {
                    plot_ui.vline(
                        VLine::new(base.strike)
                            .name(format!("Strike Price (${:.2})", base.strike))
                            .color(egui::Color32::GRAY)
                            .style(egui_plot::LineStyle::Dashed { length: 5.0 }),
                    );
                }
            });
    }

    fn greek_plot(&self, ui: &mut egui::Ui, base: &OptionParams) {
        let range = self.config.sweep.range_for(SweepVariable::Spot, base);
        let points = match greek_curve(base, SweepVariable::Spot, &range, self.greek, self.greek_type)
        {
            Ok(p) => p,
            Err(e) => {
                ui.label(format!("{}: {}", self.greek, e));
                return;
            }
        };

        Plot::new("greek_vs_spot")
            .view_aspect(2.5)
            .x_axis_label(SweepVariable::Spot.label())
            .y_axis_label(format!("{} ({})", self.greek, self.greek.unit()))
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::new(points))
                        .name(format!("{} {}", self.greek_type, self.greek))
                        .color(egui::Color32::LIGHT_GREEN)
                        .width(2.0),
                );
            });
    }
}

impl eframe::App for VizApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::SidePanel::left("controls").show(ctx, |ui| {
            ui.heading("Black-Scholes");
            ui.separator();

            ui.heading("Fetch Data");
            ui.horizontal(|ui| {
                ui.label("Ticker:");
                ui.text_edit_singleline(&mut self.ticker_input);
            });
            if ui.button("Fetch").clicked() {
                self.fetch();
            }
            if !self.fetch_status.is_empty() {
                ui.label(&self.fetch_status);
            }

            ui.separator();
            ui.heading("Inputs");
            ui.add(egui::Slider::new(&mut self.spot, 1.0..=1000.0).text("Spot"));
            ui.add(egui::Slider::new(&mut self.strike, 1.0..=1000.0).text("Strike"));
            ui.add(egui::Slider::new(&mut self.time, 0.01..=5.0).text("T (years)"));
            ui.add(egui::Slider::new(&mut self.rate, -0.05..=0.20).text("Rate"));
            ui.add(egui::Slider::new(&mut self.vol, 0.01..=2.0).text("Vol"));

            if let Ok(params) = self.params() {
                if let Ok(q) = quote(&params) {
                    ui.separator();
                    ui.heading("Values");
                    egui::Grid::new("values_grid")
                        .striped(true)
                        .spacing([20.0, 4.0])
                        .show(ui, |ui| {
                            ui.strong("");
                            ui.strong("Call");
                            ui.strong("Put");
                            ui.end_row();

                            ui.label("Price");
                            ui.label(format!("{:.2}", q.call.price));
                            ui.label(format!("{:.2}", q.put.price));
                            ui.end_row();

                            for greek in Greek::ALL {
                                ui.label(greek.label());
                                ui.label(format!("{:.4}", q.call.greeks.get(greek)));
                                ui.label(format!("{:.4}", q.put.greeks.get(greek)));
                                ui.end_row();
                            }
                        });
                }
            }

            ui.separator();
            ui.checkbox(&mut self.show_greek, "Show Greek vs Spot");
            if self.show_greek {
                ui.horizontal(|ui| {
                    for greek in Greek::ALL {
                        ui.selectable_value(&mut self.greek, greek, greek.label());
                    }
                });
                ui.horizontal(|ui| {
                    for option_type in OptionType::ALL {
                        ui.selectable_value(&mut self.greek_type, option_type, option_type.label());
                    }
                });
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let base = match self.params() {
                Ok(p) => p,
                Err(e) => {
                    ui.label(format!("Invalid inputs: {}", e));
                    return;
                }
            };

            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Option Prices vs Stock Price");
                self.price_plot(ui, &base, SweepVariable::Spot);

                ui.separator();
                ui.heading("Option Prices vs Volatility");
                self.price_plot(ui, &base, SweepVariable::Volatility);

                ui.separator();
                ui.heading("Option Prices vs Time to Expiration");
                self.price_plot(ui, &base, SweepVariable::Time);

                if self.show_greek {
                    ui.separator();
                    ui.heading(format!("{} vs Stock Price", self.greek));
                    self.greek_plot(ui, &base);
                }
            });
        });
    }
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let config = match AppConfig::load_or_default("bs.toml") {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Using default config: {}", e);
            AppConfig::default()
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_title("Black-Scholes - Option Price Surface"),
        ..Default::default()
    };

    eframe::run_native(
        "Black-Scholes Viz",
        options,
        Box::new(move |_cc| Box::new(VizApp::new(config))),
    )
}
