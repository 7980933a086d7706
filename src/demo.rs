// Demo world: a small live object graph to browse
//
// Entities move, take damage, die and respawn on every step, so the browser
// sees values change between refreshes and rows appear and disappear.
//
// Shapes exercised:
// - `Entity` derives from `Actor` through a base projection
// - `Vec2` is a value type, `Transform` and `Health` are reference types
// - `Entity::speed` is a property with a backing field
// - `Health::regen` always fails; `Health::last_hit` fails until the first hit
// - a `SingletonList` of services where the renderer accessor fails

use crate::browser::{
    downcast, obj, Browser, BrowseError, Children, DisplayOptions, Element, ObjectList, ObjectRef,
    Object, ReadError, SingletonList, TypeHandler, TypeInfo, TypeKey,
};
use std::cell::Cell;
use std::rc::Rc;

const NAMES: [&str; 8] = [
    "grunt", "scout", "archer", "golem", "wisp", "knight", "slime", "drake",
];
const ITEMS: [(&str, f32); 5] = [
    ("potion", 0.2),
    ("sword", 3.5),
    ("arrow", 0.05),
    ("shield", 5.0),
    ("coin", 0.01),
];

/// Bounds of the square the entities wander in
const ARENA: f32 = 100.0;

// ─────────────────────────────────────────────────────────────────────────────
// Components
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl Object for Vec2 {
    fn describe(&self) -> String {
        format!("({:.2}, {:.2})", self.x, self.y)
    }
}

pub struct Transform {
    pub position: Cell<Vec2>,
    pub velocity: Cell<Vec2>,
    pub rotation: Cell<f32>,
}

impl Object for Transform {
    fn describe(&self) -> String {
        format!("Transform {}", self.position.get().describe())
    }
}

pub struct Health {
    pub current: Cell<i32>,
    pub max: i32,
    pub last_hit: Cell<Option<i32>>,
}

impl Health {
    pub fn ratio(&self) -> f32 {
        self.current.get().max(0) as f32 / self.max as f32
    }

    pub fn is_dead(&self) -> bool {
        self.current.get() <= 0
    }
}

impl Object for Health {
    fn describe(&self) -> String {
        format!("Health {}/{}", self.current.get().max(0), self.max)
    }
}

pub struct Item {
    pub name: &'static str,
    pub weight: f32,
}

impl Object for Item {
    fn describe(&self) -> String {
        format!("{} ({}kg)", self.name, self.weight)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Actors and entities
// ─────────────────────────────────────────────────────────────────────────────

/// Base type of every entity
pub struct Actor {
    pub id: u32,
    pub name: String,
    pub spawned_at: u64,
}

impl Object for Actor {}

pub struct Entity {
    pub actor: Actor,
    pub transform: Rc<Transform>,
    pub health: Rc<Health>,
    pub inventory: Rc<ObjectList>,
    speed: Cell<f32>,
}

impl Entity {
    pub fn speed(&self) -> f32 {
        self.speed.get()
    }

    /// Components in attachment order
    pub fn components(&self) -> Vec<ObjectRef> {
        vec![
            self.transform.clone() as ObjectRef,
            self.health.clone() as ObjectRef,
            self.inventory.clone() as ObjectRef,
        ]
    }
}

impl Object for Entity {
    fn describe(&self) -> String {
        format!("{}#{}", self.actor.name, self.actor.id)
    }
}

/// Lists an entity's components, labeled by type
pub struct EntityHandler;

impl TypeHandler for EntityHandler {
    fn is_leaf(&self, _value: &ObjectRef) -> bool {
        false
    }

    fn breadcrumb_text(&self, parent: &ObjectRef, element: &Element) -> String {
        format!("{}.{}", parent.type_key(), element.label())
    }

    fn children<'a>(
        &'a self,
        value: &'a ObjectRef,
        _options: DisplayOptions,
    ) -> Result<Children<'a>, BrowseError> {
        let components = downcast::<Entity>(value)
            .map(Entity::components)
            .unwrap_or_default();
        Ok(Box::new(components.into_iter().map(|component| {
            let label = component.type_key().name();
            Element::value(label, Some(component))
        })))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// World
// ─────────────────────────────────────────────────────────────────────────────

pub struct World {
    pub entities: Rc<ObjectList>,
    pub tick: Cell<u64>,
    pub elapsed: Cell<f64>,
    pub gravity: Vec2,
    target_population: usize,
    next_id: Cell<u32>,
    rng: Cell<u64>,
}

impl Object for World {
    fn describe(&self) -> String {
        format!("World (tick {}, {} entities)", self.tick.get(), self.entities.len())
    }
}

impl World {
    pub fn new(population: usize, seed: u64) -> Rc<Self> {
        let world = Rc::new(Self {
            entities: Rc::new(ObjectList::new()),
            tick: Cell::new(0),
            elapsed: Cell::new(0.0),
            gravity: Vec2::new(0.0, -9.81),
            target_population: population,
            next_id: Cell::new(1),
            rng: Cell::new(seed | 1),
        });
        for _ in 0..population {
            world.spawn();
        }
        world
    }

    /// xorshift64; good enough to make the demo wander
    fn next_random(&self) -> u64 {
        let mut x = self.rng.get();
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.rng.set(x);
        x
    }

    fn random_unit(&self) -> f32 {
        (self.next_random() % 10_000) as f32 / 10_000.0
    }

    fn random_range(&self, low: f32, high: f32) -> f32 {
        low + (high - low) * self.random_unit()
    }

    pub fn spawn(&self) -> Rc<Entity> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let name = NAMES[self.next_random() as usize % NAMES.len()];

        let inventory = Rc::new(ObjectList::new());
        let slots = self.next_random() % 4;
        for _ in 0..slots {
            let (item, weight) = ITEMS[self.next_random() as usize % ITEMS.len()];
            inventory.push(Some(obj(Item { name: item, weight })));
        }
        if slots == 0 {
            inventory.push(None);
        }

        let max = 50 + (self.next_random() % 100) as i32;
        let entity = Rc::new(Entity {
            actor: Actor {
                id,
                name: name.to_string(),
                spawned_at: self.tick.get(),
            },
            transform: Rc::new(Transform {
                position: Cell::new(Vec2::new(
                    self.random_range(-ARENA, ARENA),
                    self.random_range(-ARENA, ARENA),
                )),
                velocity: Cell::new(Vec2::new(
                    self.random_range(-5.0, 5.0),
                    self.random_range(-5.0, 5.0),
                )),
                rotation: Cell::new(self.random_range(0.0, 360.0)),
            }),
            health: Rc::new(Health {
                current: Cell::new(max),
                max,
                last_hit: Cell::new(None),
            }),
            inventory,
            speed: Cell::new(0.0),
        });
        self.entities.push(Some(entity.clone()));
        tracing::debug!("Spawned {}#{}", name, id);
        entity
    }

    /// Advance the simulation by `dt` seconds
    pub fn step(&self, dt: f32) {
        self.tick.set(self.tick.get() + 1);
        self.elapsed.set(self.elapsed.get() + dt as f64);

        for entry in self.entities.snapshot().iter().flatten() {
            let Some(entity) = downcast::<Entity>(entry) else {
                continue;
            };
            self.move_entity(entity, dt);
            if self.random_unit() < 0.15 {
                let damage = 1 + (self.next_random() % 25) as i32;
                let health = &entity.health;
                health.current.set(health.current.get() - damage);
                health.last_hit.set(Some(damage));
            }
        }

        let before = self.entities.len();
        self.entities.retain(|entry| {
            entry
                .as_ref()
                .and_then(|e| downcast::<Entity>(e))
                .map_or(true, |e| !e.health.is_dead())
        });
        let died = before - self.entities.len();
        if died > 0 {
            tracing::info!("{} entities died at tick {}", died, self.tick.get());
        }
        while self.entities.len() < self.target_population {
            self.spawn();
        }
    }

    fn move_entity(&self, entity: &Entity, dt: f32) {
        let transform = &entity.transform;
        let mut velocity = transform.velocity.get();
        velocity.x += self.random_range(-1.0, 1.0);
        velocity.y += self.random_range(-1.0, 1.0);
        let mut position = transform.position.get();
        position.x += velocity.x * dt;
        position.y += velocity.y * dt;
        if position.x.abs() > ARENA {
            velocity.x = -velocity.x;
        }
        if position.y.abs() > ARENA {
            velocity.y = -velocity.y;
        }
        position.x = position.x.clamp(-ARENA, ARENA);
        position.y = position.y.clamp(-ARENA, ARENA);
        transform.position.set(position);
        transform.velocity.set(velocity);
        transform
            .rotation
            .set((transform.rotation.get() + velocity.length() * dt * 10.0) % 360.0);
        entity.speed.set(velocity.length());
    }
}

/// Global services, one of which cannot be reached
pub fn services(world: &Rc<World>) -> SingletonList {
    let clock = world.clone();
    let scene = world.clone();
    SingletonList::new("Services")
        .with("Clock", move || Ok(Some(obj(clock.elapsed.get()))))
        .with("Scene", move || Ok(Some(scene.clone() as ObjectRef)))
        .with("Input", || Ok(None))
        .with("Renderer", || {
            Err(ReadError::invocation(
                "Renderer::instance",
                ReadError::Other {
                    kind: "DeviceLost",
                    message: "no display adapter".to_string(),
                },
            ))
        })
}

// ─────────────────────────────────────────────────────────────────────────────
// Registration
// ─────────────────────────────────────────────────────────────────────────────

/// Declare the demo types and install the entity handler
pub fn register_types(browser: &Browser) {
    browser.register_type(
        TypeInfo::value::<Vec2>()
            .field("x", |v: &Vec2| v.x)
            .field("y", |v: &Vec2| v.y)
            .property("length", |v: &Vec2| Ok(v.length()))
            .build(),
    );
    browser.register_type(
        TypeInfo::class::<Transform>()
            .field("position", |t: &Transform| t.position.get())
            .field("velocity", |t: &Transform| t.velocity.get())
            .field("rotation", |t: &Transform| t.rotation.get())
            .build(),
    );
    browser.register_type(
        TypeInfo::class::<Health>()
            .field("current", |h: &Health| h.current.get())
            .field("max", |h: &Health| h.max)
            .property("ratio", |h: &Health| Ok(h.ratio()))
            .property("regen", |_: &Health| -> Result<f32, ReadError> {
                Err(ReadError::Unsupported)
            })
            .property("last_hit", |h: &Health| {
                h.last_hit
                    .get()
                    .ok_or_else(|| ReadError::InvalidState("never hit".to_string()))
            })
            .build(),
    );
    browser.register_type(
        TypeInfo::class::<Item>()
            .field("name", |i: &Item| i.name)
            .field("weight", |i: &Item| i.weight)
            .build(),
    );
    browser.register_type(
        TypeInfo::class::<Actor>()
            .field("id", |a: &Actor| a.id)
            .field("name", |a: &Actor| a.name.clone())
            .field("spawned_at", |a: &Actor| a.spawned_at)
            .build(),
    );
    browser.register_type(
        TypeInfo::class::<Entity>()
            .base::<Actor>(|e| &e.actor)
            .field_ref::<Transform>("transform", |e: &Entity| Some(e.transform.clone() as ObjectRef))
            .field_ref::<Health>("health", |e: &Entity| Some(e.health.clone() as ObjectRef))
            .field_ref::<ObjectList>("inventory", |e: &Entity| {
                Some(e.inventory.clone() as ObjectRef)
            })
            .backing_field("speed", |e: &Entity| e.speed.get())
            .property("speed", |e: &Entity| Ok(e.speed()))
            .build(),
    );
    browser.register_type(
        TypeInfo::class::<World>()
            .field_ref::<ObjectList>("entities", |w: &World| Some(w.entities.clone() as ObjectRef))
            .field("tick", |w: &World| w.tick.get())
            .field("elapsed", |w: &World| w.elapsed.get())
            .field("gravity", |w: &World| w.gravity)
            .property("population", |w: &World| Ok(w.entities.len()))
            .build(),
    );
    browser.register_handler(TypeKey::of::<Entity>(), Rc::new(EntityHandler));
}

/// Build the demo graph and add its roots to `browser`
pub fn populate(browser: &Browser, population: usize, seed: u64) -> Rc<World> {
    register_types(browser);
    let world = World::new(population, seed);
    browser.add(world.clone());
    browser.add(obj(services(&world)));
    browser.add(world.entities.clone());
    tracing::info!("Demo world ready with {} entities", population);
    world
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::{Member, Session};
    use std::time::{Duration, Instant};

    fn labels(rows: &[Element]) -> Vec<String> {
        rows.iter().map(|e| e.label().to_string()).collect()
    }

    #[test]
    fn world_keeps_population_stable() {
        let world = World::new(5, 42);
        for _ in 0..200 {
            world.step(0.25);
            assert_eq!(world.entities.len(), 5);
        }
        assert_eq!(world.tick.get(), 200);
    }

    #[test]
    fn entity_handler_lists_components_by_type() {
        let browser = Browser::new();
        let world = populate(&browser, 3, 7);
        let entity = world.entities.snapshot()[0].clone().unwrap();
        let handler = browser.handler_for(Some(&entity));
        let rows: Vec<Element> = handler
            .children(&entity, DisplayOptions::default())
            .unwrap()
            .collect();
        assert_eq!(labels(&rows), vec!["Transform", "Health", "ObjectList"]);
        assert_eq!(handler.breadcrumb_text(&entity, &rows[0]), "Entity.Transform");
    }

    #[test]
    fn entity_fields_include_actor_base() {
        let browser = Browser::new();
        let world = populate(&browser, 1, 7);
        let entity = world.entities.snapshot()[0].clone().unwrap();
        // Bypass the entity handler to see the reflective view
        let handler = browser.registry().resolve(TypeKey::object());
        let options = DisplayOptions::FIELDS.with(DisplayOptions::BACKING_FIELDS, true);
        let rows: Vec<Element> = handler.children(&entity, options).unwrap().collect();
        assert_eq!(
            labels(&rows),
            vec![
                "Fields",
                "health",
                "inventory",
                "name",
                "transform",
                "id",
                "speed",
                "spawned_at",
            ]
        );
    }

    #[test]
    fn failing_health_properties_show_kind_names() {
        let browser = Browser::new();
        let world = populate(&browser, 1, 7);
        let entity = world.entities.snapshot()[0].clone().unwrap();
        let health: ObjectRef = downcast::<Entity>(&entity).unwrap().health.clone();
        let handler = browser.handler_for(Some(&health));
        let values: Vec<(String, String)> = handler
            .children(&health, DisplayOptions::PROPERTIES)
            .unwrap()
            .skip(1)
            .map(|e| (e.label().to_string(), e.object().unwrap().describe()))
            .collect();
        assert_eq!(values[0], ("last_hit".to_string(), "InvalidState".to_string()));
        assert_eq!(values[1], ("ratio".to_string(), "1".to_string()));
        assert_eq!(values[2], ("regen".to_string(), "Unsupported".to_string()));
    }

    #[test]
    fn renderer_service_reports_device_lost() {
        let world = World::new(1, 3);
        let list = services(&world);
        let rendered: Vec<(String, Option<String>)> = list
            .as_enumerable()
            .unwrap()
            .members()
            .map(|m| match m {
                Member::Element(e) => (e.label().to_string(), e.object().map(|o| o.describe())),
                Member::Value(_) => (String::new(), None),
            })
            .collect();
        assert_eq!(rendered[0].0, "Clock");
        assert_eq!(rendered[1], ("Input".to_string(), None));
        assert_eq!(rendered[2], ("Renderer".to_string(), Some("DeviceLost".to_string())));
        assert_eq!(rendered[3].0, "Scene");
    }

    #[test]
    fn session_browses_live_world() {
        let browser = Browser::new();
        let world = populate(&browser, 4, 11);
        let mut session = Session::new(&browser, DisplayOptions::default(), Duration::from_millis(100));
        let start = Instant::now();

        let roots = session.children(&browser, start).unwrap();
        assert_eq!(labels(&roots), vec!["0", "1", "2"]);
        session.activate_row(&browser, 0).unwrap();
        let fields = session.children(&browser, start).unwrap();
        let tick_row = fields.iter().position(|e| e.label() == "tick").unwrap();
        assert_eq!(session.row_view(&browser, &fields[tick_row]).value, "0");

        world.step(0.1);
        let cached = session.children(&browser, start + Duration::from_millis(50)).unwrap();
        assert_eq!(session.row_view(&browser, &cached[tick_row]).value, "0");

        let later = start + Duration::from_millis(150);
        assert!(session.tick(later));
        let fresh = session.children(&browser, later).unwrap();
        assert_eq!(session.row_view(&browser, &fresh[tick_row]).value, "1");
    }
}
