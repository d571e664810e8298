use std::f64::consts::PI;
use symsolve_compute::numerical::{Solver, SolverConfig};
use symsolve_compute::symbolic::{cof, neg, Expr, VarMap, Variable};
use symsolve_error::Error;

/// Tolerance used by every demo.
const THRESHOLD: f64 = 1e-6;

fn deg2rad(deg: f64) -> f64 {
    deg / 180.0 * PI
}

fn rad2deg(rad: f64) -> f64 {
    rad / PI * 180.0
}

/// The line `y = x`. `x` is a parameter that the user moves, and `y` is solved for.
struct Line {
    x: Variable,
    y: Variable,
    solver: Solver,
}

impl Line {
    fn new() -> Result<Self, Error> {
        let x = Variable::new("x");
        let y = Variable::new("y");
        let solver = Solver::builder([Expr::sum([Expr::var(&y), neg(Expr::var(&x))])])
            .initial(VarMap::from([(y.clone(), 546.0)]))
            .parameters(VarMap::from([(x.clone(), 0.0)]))
            .build()?;
        Ok(Self { x, y, solver })
    }
}

/// A four-bar linkage: a crank of length 1 at angle `θ1`, a coupler of length 5 at `θ2`, a rocker
/// of length 4 at `θ3`, and a ground link of length 4 pointing at `π`. The crank angle is a
/// parameter; the coupler and rocker angles are solved for.
struct Linkage {
    crank: Variable,
    coupler: Variable,
    rocker: Variable,
    solver: Solver,
}

impl Linkage {
    fn new() -> Result<Self, Error> {
        let crank = Variable::new("θ1");
        let coupler = Variable::new("θ2");
        let rocker = Variable::new("θ3");
        let ground = Expr::Const(PI);

        let links = [
            (1.0, Expr::var(&crank)),
            (5.0, Expr::var(&coupler)),
            (4.0, Expr::var(&rocker)),
            (4.0, ground),
        ];
        let exprs = [
            Expr::sum(links.iter().map(|(len, angle)| cof(*len, angle.clone().cos()))),
            Expr::sum(links.iter().map(|(len, angle)| cof(*len, angle.clone().sin()))),
        ];

        let solver = Solver::builder(exprs)
            .initial(VarMap::from([(coupler.clone(), deg2rad(36.0)), (rocker.clone(), deg2rad(-90.0))]))
            .parameters(VarMap::from([(crank.clone(), PI / 2.0)]))
            .config(SolverConfig::builder().simplify_jacobian(true).max_iterations(Some(10)).build())
            .build()?;
        Ok(Self { crank, coupler, rocker, solver })
    }
}

/// The state kept between commands. The line and the linkage start from wherever the previous
/// command left them, like frames of an animation.
pub struct Session {
    line: Line,
    linkage: Linkage,
}

impl Session {
    /// Builds the demo systems.
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            line: Line::new()?,
            linkage: Linkage::new()?,
        })
    }

    /// Solves the three-equation system from scratch and prints every stage.
    pub fn three_eq(&self) -> Result<(), Error> {
        let a = Variable::new("a");
        let b = Variable::new("b");
        let c = Variable::new("c");
        let exprs = vec![
            Expr::sum([cof(2.0, Expr::var(&a)), neg(Expr::var(&b)), cof(4.0, Expr::var(&c)), Expr::Const(-27.0)]),
            Expr::sum([cof(4.0, Expr::var(&a).pow(2.0)), cof(6.0, Expr::var(&b)), neg(Expr::var(&c)), Expr::Const(-39.0)]),
            Expr::sum([Expr::var(&a), cof(7.0, Expr::var(&b)), cof(10.0, Expr::var(&c)), Expr::Const(-107.0)]),
        ];

        println!("expressions:");
        for expr in &exprs {
            println!("  {}", expr);
        }

        let initial = VarMap::from([(a, 1.0), (b, 2.0), (c, 3.0)]);
        let mut solver = Solver::new(exprs, initial)?;
        println!("jacobian:");
        for line in solver.jacobian().to_string().lines() {
            println!("  {}", line);
        }

        solver.iterate_n(100);

        println!("results:");
        for (var, value) in solver.variables().iter().zip(solver.values().iter()) {
            println!("  {} = {}", var, value);
        }
        for (expr, value) in solver.exprs().iter().zip(solver.residuals()) {
            println!("  {} = {}", expr, value);
        }
        println!("residual: {:e}", solver.residual_norm());
        Ok(())
    }

    /// Moves the line to the given `x` and takes ten steps.
    pub fn line(&mut self, x: f64) -> Result<(), Error> {
        let line = &mut self.line;
        line.solver.set_parameter(&line.x, x)?;
        line.solver.iterate_n(10);

        let y = line.solver.value_of(&line.y).unwrap_or(f64::NAN);
        println!("{} = {}, {} = {}", line.x, x, line.y, y);
        Ok(())
    }

    /// Turns the crank to the given angle, in degrees, and solves for the other two angles.
    pub fn linkage(&mut self, degrees: f64) -> Result<(), Error> {
        let linkage = &mut self.linkage;
        linkage.solver.set_parameter(&linkage.crank, deg2rad(degrees))?;
        let report = linkage.solver.converge(THRESHOLD);

        let angle = |var: &Variable| rad2deg(linkage.solver.value_of(var).unwrap_or(f64::NAN));
        println!(
            "{} = {}°, {} = {:.4}°, {} = {:.4}°",
            linkage.crank,
            degrees,
            linkage.coupler,
            angle(&linkage.coupler),
            linkage.rocker,
            angle(&linkage.rocker),
        );
        if report.converged {
            println!("converged in {} iteration(s), residual {:e}", report.iterations, report.residual);
        } else {
            println!(
                "did not converge after {} iteration(s), residual {:e}; the linkage may not reach this angle",
                report.iterations,
                report.residual,
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demos_run() {
        let mut session = Session::new().unwrap();
        session.three_eq().unwrap();
        session.line(25.0).unwrap();
        session.linkage(100.0).unwrap();
        assert!((session.line.solver.value_of(&session.line.y).unwrap() - 25.0).abs() < 1e-9);
        assert!(session.linkage.solver.residual_norm() < THRESHOLD);
    }
}
