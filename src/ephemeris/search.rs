#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ScanSpec {
    pub step_days: f64,
    /// Signed: negative scans backward from the start.
    pub window_days: f64,
    pub convergence_days: f64,
    pub max_iterations: usize,
}

pub(crate) fn is_genuine_crossing(f_a: f64, f_b: f64) -> bool {
    f_a * f_b < 0.0 && (f_a - f_b).abs() < 270.0
}

fn bisect<F: Fn(f64) -> f64>(
    f: &F,
    mut t_a: f64,
    mut f_a: f64,
    mut t_b: f64,
    spec: &ScanSpec,
) -> f64 {
    for _ in 0..spec.max_iterations {
        let t_mid = 0.5 * (t_a + t_b);
        let f_mid = f(t_mid);
        if f_a * f_mid <= 0.0 {
            t_b = t_mid;
        } else {
            t_a = t_mid;
            f_a = f_mid;
        }
        if (t_b - t_a).abs() < spec.convergence_days {
            break;
        }
    }
    0.5 * (t_a + t_b)
}

/// Nearest root of `f` from `start` in the direction of the window, or `None`
/// if the window is exhausted first. A root exactly at `start` is returned.
pub(crate) fn find_crossing<F: Fn(f64) -> f64>(f: F, start: f64, spec: &ScanSpec) -> Option<f64> {
    if spec.step_days <= 0.0 || spec.window_days == 0.0 {
        return None;
    }
    let direction = spec.window_days.signum();
    let end = start + spec.window_days;
    let max_steps = (spec.window_days.abs() / spec.step_days).ceil() as usize;

    let mut t_prev = start;
    let mut f_prev = f(t_prev);
    if f_prev == 0.0 {
        return Some(t_prev);
    }

    for _ in 0..max_steps {
        let mut t_curr = t_prev + direction * spec.step_days;
        if (t_curr - end) * direction > 0.0 {
            t_curr = end;
        }
        let f_curr = f(t_curr);
        if f_curr == 0.0 {
            return Some(t_curr);
        }
        if is_genuine_crossing(f_prev, f_curr) {
            let (t_a, f_a, t_b) = if t_prev < t_curr {
                (t_prev, f_prev, t_curr)
            } else {
                (t_curr, f_curr, t_prev)
            };
            return Some(bisect(&f, t_a, f_a, t_b, spec));
        }
        if t_curr == end {
            break;
        }
        t_prev = t_curr;
        f_prev = f_curr;
    }
    None
}
