use bevy::prelude::*;

use crate::engine::core::app_state::{CrashReport, ReloadScene};

#[derive(Component)]
pub struct CrashScreen;

#[derive(Component)]
pub struct ReloadButton;

/// Full-screen failure notice with the only way back: a manual reload.
pub fn spawn_crash_screen(mut commands: Commands, report: Res<CrashReport>) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                padding: UiRect::all(Val::Px(100.0)),
                row_gap: Val::Px(16.0),
                ..default()
            },
            BackgroundColor(Color::srgb(0.1, 0.0, 0.0)),
            GlobalZIndex(10),
            CrashScreen,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("SYSTEM FAILURE"),
                TextFont {
                    font_size: 32.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.33, 0.33)),
            ));
            parent.spawn((
                Text::new(report.message.clone()),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.6, 0.6)),
            ));
            parent
                .spawn((
                    Button,
                    Node {
                        width: Val::Px(220.0),
                        padding: UiRect::all(Val::Px(10.0)),
                        justify_content: JustifyContent::Center,
                        ..default()
                    },
                    BackgroundColor(Color::srgb(1.0, 0.33, 0.33)),
                    ReloadButton,
                ))
                .with_child((
                    Text::new("RELOAD (R)"),
                    TextFont {
                        font_size: 14.0,
                        ..default()
                    },
                    TextColor(Color::BLACK),
                ));
        });
}

pub fn crash_screen_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    buttons: Query<&Interaction, (Changed<Interaction>, With<ReloadButton>)>,
    mut reload: EventWriter<ReloadScene>,
) {
    let clicked = buttons
        .iter()
        .any(|interaction| *interaction == Interaction::Pressed);
    if clicked || keyboard.just_pressed(KeyCode::KeyR) {
        reload.write(ReloadScene);
    }
}

pub fn despawn_crash_screen(mut commands: Commands, screens: Query<Entity, With<CrashScreen>>) {
    for entity in &screens {
        commands.entity(entity).despawn();
    }
}
