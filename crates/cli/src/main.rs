use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use polykernel::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;

#[derive(Parser)]
#[command(name = "polykernel-cli")]
#[command(about = "Hulls, face lattices and Minkowski operations on canonical polytopes")]
struct Cmd {
    /// Number backend for every computation
    #[arg(long, value_enum, default_value_t = FieldKind::F64, global = true)]
    field: FieldKind,

    /// Comparison tolerance
    #[arg(long, default_value_t = polykernel::cfg::DEFAULT_EPS, global = true)]
    eps: f64,

    /// Write the JSON result here (plus a provenance sidecar) instead of stdout
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Wrap a shape and print its face-lattice summary
    Hull {
        #[command(flatten)]
        shape: ShapeArgs,
        #[arg(long, value_enum, default_value_t = Strategy::Rotation)]
        strategy: Strategy,
    },
    /// Minkowski sum of two shapes
    Sum {
        #[arg(long, value_enum)]
        left: Shape,
        #[arg(long, value_enum)]
        right: Shape,
        #[arg(long, default_value_t = 3)]
        dim: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, value_enum, default_value_t = SumKind::SandipDas)]
        algo: SumKind,
    },
    /// Minkowski difference of two shapes; the right one is scaled by `--scale`
    Diff {
        #[arg(long, value_enum)]
        left: Shape,
        #[arg(long, value_enum)]
        right: Shape,
        #[arg(long, default_value_t = 3)]
        dim: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 0.25)]
        scale: f64,
        #[arg(long, value_enum, default_value_t = DiffKind::Geometric)]
        algo: DiffKind,
    },
    /// Print a small provenance JSON block
    Report,
}

#[derive(Args, Clone)]
struct ShapeArgs {
    #[arg(long, value_enum)]
    shape: Shape,
    #[arg(long, default_value_t = 3)]
    dim: usize,
    /// Point count for `cyclic` and `random`
    #[arg(long, default_value_t = 12)]
    points: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[derive(Clone, Copy, Debug, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
enum FieldKind {
    F64,
    Dd,
    Rational,
}

#[derive(Clone, Copy, Debug, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
enum Shape {
    Cube,
    Simplex,
    /// `[0, e_1]`
    Segment,
    Cross,
    Box,
    Cyclic,
    Sphere,
    Random,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Strategy {
    Rotation,
    Projection,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SumKind {
    ConvexHull,
    SandipDas,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DiffKind {
    Naive,
    Geometric,
}

/// JSON view of a polytope.
#[derive(Serialize)]
struct Summary {
    space_dim: usize,
    dim: usize,
    f_vector: Vec<usize>,
    facets: usize,
    vertices: Vec<Vec<f64>>,
}

fn summarize<T: Field>(p: &ConvexPolytope<T>) -> Result<Summary> {
    Ok(Summary {
        space_dim: p.space_dim(),
        dim: p.polytope_dim()?,
        f_vector: p.f_vector()?.to_vec(),
        facets: p.hrep()?.len(),
        vertices: p.vrep()?.iter().map(|v| v.to_f64_vec()).collect(),
    })
}

fn build_shape<T: Field>(
    shape: Shape,
    dim: usize,
    points: usize,
    rng: &mut StdRng,
    cfg: &GeomCfg<T>,
) -> Result<ConvexPolytope<T>> {
    let origin = Vector::<T>::zeros(dim);
    let p = match shape {
        Shape::Cube => special::cube01(dim, cfg)?,
        Shape::Simplex => special::simplex(dim, cfg)?,
        Shape::Segment => {
            if dim == 0 {
                bail!("a segment needs --dim >= 1");
            }
            ConvexPolytope::from_vrep(vec![origin.clone(), Vector::unit(dim, 0)], cfg)?
        }
        Shape::Cross => special::ball_1(&origin, &T::one(), cfg)?,
        Shape::Box => special::ball_oo(&origin, &T::one(), cfg)?,
        Shape::Cyclic => special::cyclic(dim, points, &T::one(), cfg)?,
        Shape::Sphere => special::sphere(&origin, &T::one(), 6, 8, cfg)?,
        Shape::Random => {
            if points == 0 {
                bail!("--points must be positive for a random swarm");
            }
            let swarm: Vec<Vector<T>> = (0..points)
                .map(|_| {
                    Vector::new(
                        (0..dim)
                            .map(|_| T::from_f64(rng.gen_range(-1.0..1.0)))
                            .collect(),
                    )
                })
                .collect();
            ConvexPolytope::from_points(&swarm, cfg)?
        }
    };
    Ok(p)
}

fn hull<T: Field>(cfg: &GeomCfg<T>, args: &ShapeArgs, strategy: Strategy) -> Result<Value> {
    let mut rng = StdRng::seed_from_u64(args.seed);
    let p = build_shape(args.shape, args.dim, args.points, &mut rng, cfg)?;
    let initial = match strategy {
        Strategy::Rotation => InitialPlane::Rotation,
        Strategy::Projection => InitialPlane::Projection,
    };
    let lattice = GiftWrapping::new(cfg).with_strategy(initial).wrap(p.vrep()?)?;
    lattice.check_invariants()?;
    let p = ConvexPolytope::from_face_lattice(lattice);
    tracing::info!(shape = ?args.shape, dim = args.dim, faces = p.flrep()?.number_of_faces(), "hull");
    Ok(json!({ "shape": args.shape, "polytope": summarize(&p)? }))
}

fn sum<T: Field>(
    cfg: &GeomCfg<T>,
    (left, right, dim, seed): (Shape, Shape, usize, u64),
    algo: SumKind,
) -> Result<Value> {
    let mut rng = StdRng::seed_from_u64(seed);
    let f = build_shape(left, dim, 2 * dim + 2, &mut rng, cfg)?;
    let g = build_shape(right, dim, 2 * dim + 2, &mut rng, cfg)?;
    let algo = match algo {
        SumKind::ConvexHull => SumAlgo::ByConvexHull,
        SumKind::SandipDas => SumAlgo::BySandipDas,
    };
    let s = minkowski_sum(&f, &g, algo)?;
    tracing::info!(?left, ?right, ?algo, "sum");
    Ok(json!({ "left": left, "right": right, "algo": format!("{algo:?}"), "polytope": summarize(&s)? }))
}

fn diff<T: Field>(
    cfg: &GeomCfg<T>,
    (left, right, dim, seed): (Shape, Shape, usize, u64),
    scale: f64,
    algo: DiffKind,
) -> Result<Value> {
    if scale.is_nan() || scale <= 0.0 {
        bail!("--scale must be positive, got {scale}");
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let f = build_shape(left, dim, 2 * dim + 2, &mut rng, cfg)?;
    let g = build_shape(right, dim, 2 * dim + 2, &mut rng, cfg)?;
    let factor = T::from_f64(scale);
    let g = ConvexPolytope::from_vrep(g.vrep()?.iter().map(|v| v.scale(&factor)).collect(), cfg)?;
    let algo = match algo {
        DiffKind::Naive => DiffAlgo::Naive,
        DiffKind::Geometric => DiffAlgo::Geometric,
    };
    let polytope = match minkowski_diff(&f, &g, algo)? {
        Some(d) => serde_json::to_value(summarize(&d)?)?,
        None => Value::Null,
    };
    tracing::info!(?left, ?right, ?algo, empty = polytope.is_null(), "diff");
    Ok(json!({ "left": left, "right": right, "scale": scale, "algo": format!("{algo:?}"), "polytope": polytope }))
}

fn dispatch<T: Field>(eps: f64, action: &Action) -> Result<Value> {
    let cfg = GeomCfg::<T>::new(T::from_f64(eps))?;
    match action {
        Action::Hull { shape, strategy } => hull(&cfg, shape, *strategy),
        Action::Sum {
            left,
            right,
            dim,
            seed,
            algo,
        } => sum(&cfg, (*left, *right, *dim, *seed), *algo),
        Action::Diff {
            left,
            right,
            dim,
            seed,
            scale,
            algo,
        } => diff(&cfg, (*left, *right, *dim, *seed), *scale, *algo),
        Action::Report => Ok(report()),
    }
}

fn report() -> Value {
    json!({
        "code_rev": provenance::current_git_rev(),
        "version": polykernel::VERSION,
        "fields": ["f64", "dd", "rational"],
    })
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    let mut out = match cmd.field {
        FieldKind::F64 => dispatch::<f64>(cmd.eps, &cmd.action)?,
        FieldKind::Dd => dispatch::<DDouble>(cmd.eps, &cmd.action)?,
        FieldKind::Rational => dispatch::<BigRational>(cmd.eps, &cmd.action)?,
    };
    if let Value::Object(map) = &mut out {
        map.insert("field".into(), serde_json::to_value(cmd.field)?);
    }
    match cmd.out {
        Some(path) => {
            provenance::write_json(&path, &out)?;
            let params = json!({ "field": cmd.field, "eps": cmd.eps });
            let sidecar = provenance::write_sidecar(&path, provenance::Payload::new(params))?;
            tracing::info!(out = %path.display(), sidecar = %sidecar.display(), "wrote");
        }
        None => println!("{}", serde_json::to_string_pretty(&out)?),
    }
    Ok(())
}
