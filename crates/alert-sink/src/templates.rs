use flip_monitor::{AlertRecord, FlipWarning, Urgency};

/// Notification text for flip alerts and warnings.
pub trait AlertText {
    fn headline(&self) -> String;
    fn summary(&self) -> String;
}

/// Notification title for an urgency level.
pub fn title_for(urgency: Urgency) -> &'static str {
    match urgency {
        Urgency::Critical => "CRITICAL SIGNAL",
        Urgency::High => "HOT SIGNAL",
        Urgency::Medium | Urgency::Low => "Signal Alert",
    }
}

/// Embed colour for an urgency level.
pub fn color_for(urgency: Urgency) -> u32 {
    match urgency {
        Urgency::Critical => 0xff0000,
        Urgency::High => 0xff6600,
        Urgency::Medium => 0xffcc00,
        Urgency::Low => 0x0099ff,
    }
}

impl AlertText for AlertRecord {
    fn headline(&self) -> String {
        format!(
            "{}: {} flipped to {} underdog",
            title_for(self.urgency),
            self.team,
            self.current_odds
        )
    }

    fn summary(&self) -> String {
        let flip = self.flip_size();
        let mut text = format!(
            "{} were {} favorite vs {}, now {} underdog ({}{} point flip). \
             Our model rates them {:.0}% to win with {:+.1}% edge.",
            self.team,
            self.original_odds,
            self.opponent,
            self.current_odds,
            if flip > 0 { "+" } else { "" },
            flip,
            self.model_win_probability * 100.0,
            self.edge
        );
        if self.hot_signal {
            text.push_str(" HOT SIGNAL!");
        }
        text
    }
}

impl AlertText for FlipWarning {
    fn headline(&self) -> String {
        format!("Flip watch: {}", self.team)
    }

    fn summary(&self) -> String {
        format!(
            "{} trending toward underdog status ({})",
            self.team, self.current_odds
        )
    }
}
